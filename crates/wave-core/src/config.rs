//! Engine parameters gathered into one value.
//!
//! `WaveConfig::default()` reproduces the constants in `constants.rs`. Hosts
//! and tests override individual fields and call [`WaveConfig::validate`]
//! before handing the config to a [`crate::Driver`].

use crate::constants::*;
use crate::error::{Result, WaveError};
use std::time::Duration;

/// Inclusive `[min, max]` bounds for a randomized parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Span<T> {
    pub min: T,
    pub max: T,
}

impl<T: Copy> Span<T> {
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    pub const fn fixed(value: T) -> Self {
        Self {
            min: value,
            max: value,
        }
    }
}

impl<T: Copy> From<(T, T)> for Span<T> {
    fn from((min, max): (T, T)) -> Self {
        Self { min, max }
    }
}

/// Ranges sampled once per curve at spawn time.
#[derive(Clone, Debug, PartialEq)]
pub struct CurveRanges {
    pub group_size: Span<u32>,
    pub amplitude: Span<f64>,
    pub offset: Span<f64>,
    pub width: Span<f64>,
    pub speed: Span<f64>,
    pub despawn_timeout_ms: Span<u32>,
}

impl Default for CurveRanges {
    fn default() -> Self {
        Self {
            group_size: GROUP_SIZE_RANGE.into(),
            amplitude: AMPLITUDE_RANGE.into(),
            offset: OFFSET_RANGE.into(),
            width: WIDTH_RANGE.into(),
            speed: SPEED_RANGE.into(),
            despawn_timeout_ms: DESPAWN_TIMEOUT_MS_RANGE.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct WaveConfig {
    pub graph_x: f64,
    pub sample_step: f64,
    pub amplitude_factor: f64,
    pub attenuation_k: f64,
    pub speed_factor: f64,
    pub despawn_factor: f64,
    pub lerp_speed: f64,
    pub respawn_check_interval: Duration,
    pub ranges: CurveRanges,
    pub show_guide: bool,
    pub initial_amplitude: f64,
    pub initial_speed: f64,
    /// Fixed RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            graph_x: GRAPH_X,
            sample_step: SAMPLE_STEP,
            amplitude_factor: AMPLITUDE_FACTOR,
            attenuation_k: ATTENUATION_K,
            speed_factor: SPEED_FACTOR,
            despawn_factor: DESPAWN_FACTOR,
            lerp_speed: LERP_SPEED,
            respawn_check_interval: RESPAWN_CHECK_INTERVAL,
            ranges: CurveRanges::default(),
            show_guide: true,
            initial_amplitude: DEFAULT_AMPLITUDE,
            initial_speed: DEFAULT_SPEED,
            seed: None,
        }
    }
}

impl WaveConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        positive("graph_x", self.graph_x)?;
        positive("sample_step", self.sample_step)?;
        positive("attenuation_k", self.attenuation_k)?;
        non_negative("amplitude_factor", self.amplitude_factor)?;
        non_negative("speed_factor", self.speed_factor)?;
        positive("despawn_factor", self.despawn_factor)?;
        if !(self.lerp_speed > 0.0 && self.lerp_speed <= 1.0) {
            return Err(WaveError::config("lerp_speed", "must lie in (0, 1]"));
        }
        non_negative("initial_amplitude", self.initial_amplitude)?;
        non_negative("initial_speed", self.initial_speed)?;

        let r = &self.ranges;
        ordered("ranges.group_size", r.group_size)?;
        if r.group_size.min < 1 || r.group_size.max as usize > MAX_CURVES_PER_GROUP {
            return Err(WaveError::config(
                "ranges.group_size",
                format!("must lie within 1..={MAX_CURVES_PER_GROUP}"),
            ));
        }
        ordered("ranges.amplitude", r.amplitude)?;
        non_negative("ranges.amplitude", r.amplitude.min)?;
        ordered("ranges.offset", r.offset)?;
        ordered("ranges.width", r.width)?;
        positive("ranges.width", r.width.min)?;
        ordered("ranges.speed", r.speed)?;
        non_negative("ranges.speed", r.speed.min)?;
        ordered("ranges.despawn_timeout_ms", r.despawn_timeout_ms)?;
        Ok(())
    }
}

fn positive(field: &'static str, v: f64) -> Result<()> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(WaveError::config(field, format!("must be finite and > 0, got {v}")))
    }
}

fn non_negative(field: &'static str, v: f64) -> Result<()> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(WaveError::config(field, format!("must be finite and >= 0, got {v}")))
    }
}

fn ordered<T: PartialOrd + std::fmt::Debug + Copy>(field: &'static str, s: Span<T>) -> Result<()> {
    if s.min <= s.max {
        Ok(())
    } else {
        Err(WaveError::config(
            field,
            format!("min {:?} exceeds max {:?}", s.min, s.max),
        ))
    }
}
