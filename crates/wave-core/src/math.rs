//! Pure waveform math shared by the CPU renderer and mirrored by the shader.

use crate::constants::{ATTENUATION_MIN_DENOMINATOR, STATIC_OFFSET_SPREAD};
use rand::Rng;
use std::f64::consts::TAU;

/// Shape parameters of one curve as consumed by [`curve_y`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurveShape {
    pub amplitude: f64,
    pub phase: f64,
    pub offset: f64,
    pub width: f64,
    pub verse: f64,
}

/// Edge falloff `(k / (k + x²))^k`. Equals 1 at `x = 0` and stays in `(0, 1]`.
#[inline]
pub fn attenuation(x: f64, k: f64) -> f64 {
    let denom = (k + x * x).max(ATTENUATION_MIN_DENOMINATOR);
    let v = (k / denom).powf(k);
    // Far tails underflow to 0 in f64; keep the documented open lower bound.
    v.clamp(f64::MIN_POSITIVE, 1.0)
}

/// Horizontal center offset of member `index` in a group of `group_size`.
#[inline]
pub fn static_offset(index: usize, group_size: usize) -> f64 {
    if group_size > 1 {
        STATIC_OFFSET_SPREAD * (-1.0 + 2.0 * index as f64 / (group_size - 1) as f64)
    } else {
        0.0
    }
}

/// Non-negative height of one curve at `x`.
#[inline]
pub fn curve_y(x: f64, shape: &CurveShape, index: usize, group_size: usize, k: f64) -> f64 {
    let local_offset = static_offset(index, group_size) + shape.offset;
    let width = if shape.width.is_finite() && shape.width > 0.0 {
        shape.width
    } else {
        1.0
    };
    let local_x = x / width - local_offset;
    (shape.amplitude * (shape.verse * local_x - shape.phase).sin() * attenuation(local_x, k)).abs()
}

#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from * (1.0 - t) + to * t
}

/// Wrap a phase into `[0, 2π)`.
#[inline]
pub fn normalize_phase(p: f64) -> f64 {
    if !p.is_finite() {
        return 0.0;
    }
    let r = p.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if r >= TAU {
        0.0
    } else {
        r
    }
}

/// Uniform sample in `[min, max]`; returns `min` for a degenerate range.
pub fn random_range<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    if max > min {
        rng.gen_range(min..=max)
    } else {
        min
    }
}

/// Uniform integer in `[min, max]` inclusive.
pub fn random_int<R: Rng + ?Sized>(rng: &mut R, min: u32, max: u32) -> u32 {
    if max > min {
        rng.gen_range(min..=max)
    } else {
        min
    }
}

/// Random direction sign, `-1.0` or `+1.0`.
pub fn random_verse<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    if rng.gen_bool(0.5) {
        1.0
    } else {
        -1.0
    }
}
