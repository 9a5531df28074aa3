//! CPU rendering path: merged channel heights turned into closed polylines.
//!
//! The renderer never touches pixels. It hands one [`Band`] per (channel,
//! side) to a [`BandSink`], which fills it with the band color using additive
//! blending. The web frontend's canvas sink and the recording `Vec<Band>`
//! sink are the two implementations in this workspace.

use crate::channel::Channel;
use crate::config::WaveConfig;
use crate::constants::GUIDE_HALF_THICKNESS_PX;
use crate::manager::CurveManager;
use crate::math;
use glam::Vec2;

/// Drawable area in device pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub pixel_ratio: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            pixel_ratio: 1.0,
        }
    }

    pub fn with_pixel_ratio(mut self, ratio: f32) -> Self {
        self.pixel_ratio = if ratio.is_finite() && ratio > 0.0 {
            ratio
        } else {
            1.0
        };
        self
    }

    /// Height of the mirror axis (`H` in the band formula).
    pub fn baseline(&self) -> f64 {
        (self.height.max(0.0) as f64) * 0.5
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Which half of the mirrored band is being drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Above,
    Below,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Above, Side::Below];

    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Side::Above => 1.0,
            Side::Below => -1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendMode {
    /// `dst = src + dst` on every component.
    Additive,
}

/// One closed, flat-colored region.
#[derive(Clone, Debug, PartialEq)]
pub struct Band {
    pub channel: Channel,
    pub side: Side,
    pub color: [f32; 4],
    pub blend: BlendMode,
    /// Screen-space vertices; the last vertex connects back to the first.
    pub points: Vec<Vec2>,
}

pub trait BandSink {
    fn begin_frame(&mut self, _viewport: &Viewport) {}
    fn fill_band(&mut self, band: &Band);
    fn end_frame(&mut self) {}
}

/// Records every band of the last frame.
impl BandSink for Vec<Band> {
    fn begin_frame(&mut self, _viewport: &Viewport) {
        self.clear();
    }

    fn fill_band(&mut self, band: &Band) {
        self.push(band.clone());
    }
}

/// Read-only view of one tick handed to a renderer.
pub struct FrameState<'a> {
    pub manager: &'a CurveManager,
    /// Globally smoothed amplitude.
    pub amplitude: f64,
    /// Global phase in `[0, 2π)`.
    pub phase: f64,
    pub viewport: Viewport,
}

/// A per-tick render pass driven by [`crate::Driver`].
pub trait WaveRenderer {
    fn render(&mut self, frame: &FrameState<'_>);
}

/// Constants of the composite band formula.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompositeParams {
    pub graph_x: f64,
    pub amplitude_factor: f64,
    pub attenuation_k: f64,
}

impl From<&WaveConfig> for CompositeParams {
    fn from(c: &WaveConfig) -> Self {
        Self {
            graph_x: c.graph_x,
            amplitude_factor: c.amplitude_factor,
            attenuation_k: c.attenuation_k,
        }
    }
}

/// Band height above the baseline at domain position `x` for a channel whose
/// merged curve height is `merged`. Applies the global edge falloff over the
/// normalized domain on top of the per-curve falloff already in `merged`.
#[inline]
pub fn composite_y(
    merged: f64,
    x: f64,
    amplitude: f64,
    baseline: f64,
    params: &CompositeParams,
) -> f64 {
    let global = math::attenuation(2.0 * x / params.graph_x, params.attenuation_k);
    params.amplitude_factor * baseline * amplitude * merged * global
}

/// Map a domain position to screen x.
#[inline]
pub fn screen_x(x: f64, width: f64, graph_x: f64) -> f64 {
    width * (x + graph_x) / (2.0 * graph_x)
}

pub struct CpuRenderer<S: BandSink> {
    sink: S,
    params: CompositeParams,
    sample_step: f64,
    // reused across frames
    band: Band,
}

impl<S: BandSink> CpuRenderer<S> {
    pub fn new(config: &WaveConfig, sink: S) -> Self {
        Self {
            sink,
            params: CompositeParams::from(config),
            sample_step: config.sample_step,
            band: Band {
                channel: Channel::Guide,
                side: Side::Above,
                color: Channel::Guide.color(),
                blend: BlendMode::Additive,
                points: Vec::new(),
            },
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Number of x samples across the domain, both ends included.
    pub fn sample_count(&self) -> usize {
        let span = 2.0 * self.params.graph_x;
        let step = if self.sample_step > 0.0 {
            self.sample_step
        } else {
            crate::constants::SAMPLE_STEP
        };
        (span / step).round() as usize + 1
    }

    fn x_at(&self, i: usize, count: usize) -> f64 {
        let g = self.params.graph_x;
        if count < 2 {
            return 0.0;
        }
        -g + 2.0 * g * i as f64 / (count - 1) as f64
    }

    fn emit_guide(&mut self, vp: &Viewport, side: Side) {
        let h = vp.baseline();
        let w = vp.width;
        let y = (h - side.sign() * GUIDE_HALF_THICKNESS_PX * vp.pixel_ratio as f64) as f32;
        let base = h as f32;
        self.band.channel = Channel::Guide;
        self.band.side = side;
        self.band.color = Channel::Guide.color();
        self.band.points.clear();
        self.band.points.extend_from_slice(&[
            Vec2::new(0.0, base),
            Vec2::new(0.0, y),
            Vec2::new(w, y),
            Vec2::new(w, base),
        ]);
        self.sink.fill_band(&self.band);
    }

    fn emit_channel(&mut self, frame: &FrameState<'_>, channel: Channel, side: Side) {
        let vp = &frame.viewport;
        let h = vp.baseline();
        let w = vp.width as f64;
        let count = self.sample_count();
        self.band.channel = channel;
        self.band.side = side;
        self.band.color = channel.color();
        self.band.points.clear();
        self.band.points.reserve(count + 2);
        self.band.points.push(Vec2::new(0.0, h as f32));
        for i in 0..count {
            let x = self.x_at(i, count);
            let merged = frame.manager.evaluate_group_y(channel, x);
            let y = composite_y(merged, x, frame.amplitude, h, &self.params);
            let sx = screen_x(x, w, self.params.graph_x);
            let sy = h - side.sign() * y;
            self.band.points.push(Vec2::new(sx as f32, sy as f32));
        }
        self.band.points.push(Vec2::new(vp.width, h as f32));
        self.sink.fill_band(&self.band);
    }
}

impl<S: BandSink> WaveRenderer for CpuRenderer<S> {
    fn render(&mut self, frame: &FrameState<'_>) {
        let vp = frame.viewport;
        self.sink.begin_frame(&vp);
        if vp.is_empty() {
            self.sink.end_frame();
            return;
        }
        if frame.manager.show_guide() {
            for side in Side::BOTH {
                self.emit_guide(&vp, side);
            }
        }
        for channel in Channel::WAVES {
            for side in Side::BOTH {
                self.emit_channel(frame, channel, side);
            }
        }
        self.sink.end_frame();
    }
}
