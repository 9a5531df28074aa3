//! Canvas 2D band sink. Bands are filled flat with `"lighter"` compositing,
//! the canvas equivalent of additive blending.

use wave_core::{Band, BandSink, Channel, Viewport};
use web_sys as web;

pub struct CanvasSink {
    ctx: web::CanvasRenderingContext2d,
    styles: [String; 4],
}

impl CanvasSink {
    pub fn new(ctx: web::CanvasRenderingContext2d) -> Self {
        let mut styles: [String; 4] = Default::default();
        for ch in Channel::ALL {
            styles[ch.index()] = ch.css_color();
        }
        Self { ctx, styles }
    }
}

impl BandSink for CanvasSink {
    fn begin_frame(&mut self, viewport: &Viewport) {
        self.ctx
            .clear_rect(0.0, 0.0, viewport.width as f64, viewport.height as f64);
        // resizing the canvas resets context state, so set this every frame
        if let Err(e) = self.ctx.set_global_composite_operation("lighter") {
            log::error!("[canvas] composite op rejected: {e:?}");
        }
    }

    fn fill_band(&mut self, band: &Band) {
        let Some((first, rest)) = band.points.split_first() else {
            return;
        };
        self.ctx.set_fill_style_str(&self.styles[band.channel.index()]);
        self.ctx.begin_path();
        self.ctx.move_to(first.x as f64, first.y as f64);
        for p in rest {
            self.ctx.line_to(p.x as f64, p.y as f64);
        }
        self.ctx.close_path();
        self.ctx.fill();
    }
}
