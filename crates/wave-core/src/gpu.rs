//! Shader-side representation of a frame.
//!
//! The GPU path uploads a fixed lattice of x samples once and, per draw, one
//! [`BandUniforms`] block carrying the channel's curves. The vertex stage of
//! `shaders/siri_wave.wgsl` evaluates the band height per sample.
//! [`kernel`] is a line-for-line `f32` port of that vertex stage, used as the
//! reference when checking the two paths against each other.

use crate::channel::Channel;
use crate::constants::{GUIDE_HALF_THICKNESS_PX, MAX_CURVES_PER_GROUP};
use crate::manager::ChannelGroup;
use crate::render::{CompositeParams, FrameState, Side};

pub static SIRI_WAVE_WGSL: &str = include_str!("../shaders/siri_wave.wgsl");

/// Byte distance between per-draw uniform blocks (dynamic offset alignment).
pub const UNIFORM_SLOT_STRIDE: u64 = 256;
/// Guide + three channels, each drawn above and below the baseline.
pub const MAX_BAND_DRAWS: usize = 8;

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CurvePacked {
    /// amplitude, phase, offset, width
    pub shape: [f32; 4],
    /// verse, group index, group size, unused
    pub placement: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BandUniforms {
    pub color: [f32; 4],
    /// width, baseline height, direction, global amplitude
    pub viewport: [f32; 4],
    /// graph_x, attenuation k, amplitude factor, minimum height
    pub shape: [f32; 4],
    /// sample count, curve count, unused, unused
    pub counts: [u32; 4],
    pub curves: [CurvePacked; MAX_CURVES_PER_GROUP],
}

const _: () = assert!(std::mem::size_of::<BandUniforms>() as u64 <= UNIFORM_SLOT_STRIDE);

/// One vertex of the sample lattice: domain x and 0 (baseline) or 1 (crest).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LatticeVertex {
    pub x: f32,
    pub edge: f32,
}

/// Triangle-strip lattice spanning `[-graph_x, graph_x]` with `samples` columns.
pub fn build_lattice(graph_x: f64, samples: u32) -> Vec<LatticeVertex> {
    let n = samples.max(2);
    let mut out = Vec::with_capacity(n as usize * 2);
    for i in 0..n {
        let x = (-graph_x + 2.0 * graph_x * i as f64 / (n - 1) as f64) as f32;
        out.push(LatticeVertex { x, edge: 0.0 });
        out.push(LatticeVertex { x, edge: 1.0 });
    }
    out
}

pub fn pack_curves(group: &ChannelGroup) -> ([CurvePacked; MAX_CURVES_PER_GROUP], u32) {
    let mut packed = [CurvePacked::default(); MAX_CURVES_PER_GROUP];
    let size = group.size() as f32;
    for (slot, c) in packed.iter_mut().zip(group.curves()) {
        let s = c.shape();
        *slot = CurvePacked {
            shape: [
                s.amplitude as f32,
                s.phase as f32,
                s.offset as f32,
                s.width as f32,
            ],
            placement: [s.verse as f32, c.group_index() as f32, size, 0.0],
        };
    }
    (packed, group.size().min(MAX_CURVES_PER_GROUP) as u32)
}

/// Uniform block for one draw of `channel` on `side`.
pub fn pack_band(
    frame: &FrameState<'_>,
    channel: Channel,
    side: Side,
    params: &CompositeParams,
    sample_count: u32,
) -> BandUniforms {
    let vp = &frame.viewport;
    let (curves, count, floor) = match frame.manager.group(channel) {
        Some(g) => {
            let (curves, count) = pack_curves(g);
            (curves, count, 0.0)
        }
        None => (
            [CurvePacked::default(); MAX_CURVES_PER_GROUP],
            0,
            GUIDE_HALF_THICKNESS_PX * vp.pixel_ratio as f64,
        ),
    };
    BandUniforms {
        color: channel.color(),
        viewport: [
            vp.width,
            vp.baseline() as f32,
            side.sign() as f32,
            frame.amplitude as f32,
        ],
        shape: [
            params.graph_x as f32,
            params.attenuation_k as f32,
            params.amplitude_factor as f32,
            floor as f32,
        ],
        counts: [sample_count, count, 0, 0],
        curves,
    }
}

/// Draw order shared with the CPU renderer: guide first, then red, green, blue.
pub fn band_draws(show_guide: bool) -> impl Iterator<Item = (Channel, Side)> {
    Channel::ALL
        .into_iter()
        .filter(move |ch| show_guide || *ch != Channel::Guide)
        .flat_map(|ch| Side::BOTH.into_iter().map(move |s| (ch, s)))
}

/// `f32` port of the vertex stage.
pub mod kernel {
    use super::{BandUniforms, CurvePacked, LatticeVertex};
    use crate::constants::{ATTENUATION_MIN_DENOMINATOR, MAX_CURVES_PER_GROUP};

    #[inline]
    pub fn attenuation(x: f32, k: f32) -> f32 {
        let denom = (k + x * x).max(ATTENUATION_MIN_DENOMINATOR as f32);
        (k / denom).powf(k)
    }

    #[inline]
    pub fn static_offset(index: f32, size: f32) -> f32 {
        if size > 1.0 {
            4.0 * (-1.0 + 2.0 * index / (size - 1.0))
        } else {
            0.0
        }
    }

    #[inline]
    pub fn curve_y(x: f32, c: &CurvePacked, k: f32) -> f32 {
        let width = if c.shape[3] > 0.0 { c.shape[3] } else { 1.0 };
        let local_offset = static_offset(c.placement[1], c.placement[2]) + c.shape[2];
        let local_x = x / width - local_offset;
        (c.shape[0] * (c.placement[0] * local_x - c.shape[1]).sin() * attenuation(local_x, k)).abs()
    }

    /// Band height above the baseline at domain position `x`.
    pub fn band_height(u: &BandUniforms, x: f32) -> f32 {
        let count = (u.counts[1] as usize).min(MAX_CURVES_PER_GROUP);
        let k = u.shape[1];
        let mut sum = 0.0f32;
        for c in &u.curves[..count] {
            sum += curve_y(x, c, k);
        }
        let merged = if count > 0 { sum / count as f32 } else { 0.0 };
        let global = attenuation(2.0 * x / u.shape[0], k);
        let y = u.shape[2] * u.viewport[1] * u.viewport[3] * merged * global;
        y.max(u.shape[3])
    }

    /// Screen-space position of a lattice vertex.
    pub fn vertex_position(u: &BandUniforms, v: &LatticeVertex) -> [f32; 2] {
        let g = u.shape[0];
        let h = u.viewport[1];
        let y = if v.edge > 0.5 { band_height(u, v.x) } else { 0.0 };
        let sx = u.viewport[0] * (v.x + g) / (2.0 * g);
        [sx, h - u.viewport[2] * y]
    }
}
