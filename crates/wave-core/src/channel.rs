use crate::constants::CHANNEL_COLORS;

/// Color group a curve belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    Red,
    Green,
    Blue,
    /// Flat decorative line along the baseline; owns no curves.
    Guide,
}

impl Channel {
    /// The animated channels, in draw order.
    pub const WAVES: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];
    pub const ALL: [Channel; 4] = [Channel::Guide, Channel::Red, Channel::Green, Channel::Blue];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
            Channel::Guide => 3,
        }
    }

    /// Flat fill color, premultiplied RGBA in `[0, 1]`.
    #[inline]
    pub const fn color(self) -> [f32; 4] {
        CHANNEL_COLORS[self.index()]
    }

    /// CSS `rgba(...)` string for canvas-style sinks.
    pub fn css_color(self) -> String {
        let [r, g, b, a] = self.color();
        // Colors are premultiplied; undo it for CSS which expects straight alpha.
        let un = |c: f32| {
            if a > 0.0 {
                ((c / a).clamp(0.0, 1.0) * 255.0).round() as u8
            } else {
                0
            }
        };
        format!("rgba({},{},{},{:.3})", un(r), un(g), un(b), a)
    }
}
