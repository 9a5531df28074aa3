//! One sinusoidal curve and its fade lifecycle.
//!
//! A curve is spawned with amplitude 0, rises by a fixed step per tick until
//! its despawn timeout has elapsed, then falls by the same step. Shape
//! parameters are rolled once at spawn and never change afterwards.

use crate::channel::Channel;
use crate::config::CurveRanges;
use crate::math::{self, CurveShape};
use rand::Rng;
use std::time::Duration;

/// Parameters fixed for a curve's whole life.
#[derive(Clone, Debug, PartialEq)]
pub struct CurveParams {
    pub final_amplitude: f64,
    pub offset: f64,
    pub width: f64,
    /// Direction of travel, `-1.0` or `+1.0`.
    pub verse: f64,
    pub speed: f64,
    pub despawn_timeout_ms: u32,
    /// Animation-clock time at spawn.
    pub spawned_at: Duration,
    pub group_index: usize,
    pub channel: Channel,
}

impl CurveParams {
    /// Roll fresh parameters from `ranges`.
    pub fn random<R: Rng + ?Sized>(
        rng: &mut R,
        ranges: &CurveRanges,
        channel: Channel,
        group_index: usize,
        spawned_at: Duration,
    ) -> Self {
        Self {
            final_amplitude: math::random_range(rng, ranges.amplitude.min, ranges.amplitude.max),
            offset: math::random_range(rng, ranges.offset.min, ranges.offset.max),
            width: math::random_range(rng, ranges.width.min, ranges.width.max),
            verse: math::random_verse(rng),
            speed: math::random_range(rng, ranges.speed.min, ranges.speed.max),
            despawn_timeout_ms: math::random_int(
                rng,
                ranges.despawn_timeout_ms.min,
                ranges.despawn_timeout_ms.max,
            ),
            spawned_at,
            group_index,
            channel,
        }
    }
}

/// Per-tick step sizes applied by [`Curve::update`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurveDynamics {
    pub despawn_factor: f64,
    pub speed_factor: f64,
}

impl Default for CurveDynamics {
    fn default() -> Self {
        Self {
            despawn_factor: crate::constants::DESPAWN_FACTOR,
            speed_factor: crate::constants::SPEED_FACTOR,
        }
    }
}

/// Lifecycle stage, derived from amplitude and elapsed time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CurveStage {
    FadingIn,
    Holding,
    FadingOut,
    Dead,
}

#[derive(Clone, Debug)]
pub struct Curve {
    params: CurveParams,
    amplitude: f64,
    phase: f64,
    elapsed: Duration,
}

impl Curve {
    pub fn new(params: CurveParams) -> Self {
        Self {
            params,
            amplitude: 0.0,
            phase: 0.0,
            elapsed: Duration::ZERO,
        }
    }

    pub fn spawn<R: Rng + ?Sized>(
        rng: &mut R,
        ranges: &CurveRanges,
        channel: Channel,
        group_index: usize,
        now: Duration,
    ) -> Self {
        Self::new(CurveParams::random(rng, ranges, channel, group_index, now))
    }

    /// Build a curve mid-life. Amplitude is clamped to `[0, final_amplitude]`
    /// and phase is wrapped.
    pub fn with_state(params: CurveParams, amplitude: f64, phase: f64, elapsed: Duration) -> Self {
        let amplitude = amplitude.clamp(0.0, params.final_amplitude.max(0.0));
        Self {
            params,
            amplitude,
            phase: math::normalize_phase(phase),
            elapsed,
        }
    }

    pub fn params(&self) -> &CurveParams {
        &self.params
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn group_index(&self) -> usize {
        self.params.group_index
    }

    fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }

    fn timed_out(&self) -> bool {
        self.elapsed_ms() >= self.params.despawn_timeout_ms as f64
    }

    /// Advance one tick: step the fade envelope and the phase.
    pub fn update(&mut self, dt: Duration, global_speed: f64, dynamics: &CurveDynamics) {
        self.elapsed += dt;
        let step = if self.timed_out() {
            -dynamics.despawn_factor
        } else {
            dynamics.despawn_factor
        };
        self.amplitude =
            (self.amplitude + step).clamp(0.0, self.params.final_amplitude.max(0.0));

        self.phase = math::normalize_phase(
            self.phase + global_speed * self.params.speed * dynamics.speed_factor,
        );
    }

    /// Faded out completely after the timeout. A curve at 0 mid fade-in is not dead.
    pub fn is_dead(&self) -> bool {
        self.amplitude <= 0.0
            && self.elapsed_ms() / 1000.0 > self.params.despawn_timeout_ms as f64 / 1000.0
    }

    pub fn stage(&self) -> CurveStage {
        if self.is_dead() {
            CurveStage::Dead
        } else if self.timed_out() {
            CurveStage::FadingOut
        } else if self.amplitude >= self.params.final_amplitude {
            CurveStage::Holding
        } else {
            CurveStage::FadingIn
        }
    }

    pub fn shape(&self) -> CurveShape {
        CurveShape {
            amplitude: self.amplitude,
            phase: self.phase,
            offset: self.params.offset,
            width: self.params.width,
            verse: self.params.verse,
        }
    }

    /// Height of this curve at `x` within a group of `group_size`.
    #[inline]
    pub fn evaluate_y(&self, x: f64, group_size: usize, k: f64) -> f64 {
        math::curve_y(x, &self.shape(), self.params.group_index, group_size, k)
    }
}
