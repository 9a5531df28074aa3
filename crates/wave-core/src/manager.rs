//! Channel groups and their respawn policy.
//!
//! The manager exclusively owns every curve. Each wave channel holds 2–5
//! curves whose heights are averaged into one band. A group is replaced
//! wholesale once all of its members have faded out, never partially.

use crate::channel::Channel;
use crate::config::{CurveRanges, WaveConfig};
use crate::constants::MAX_CURVES_PER_GROUP;
use crate::curve::{Curve, CurveDynamics};
use crate::math;
use rand::prelude::*;
use smallvec::SmallVec;
use std::time::Duration;

pub type CurveList = SmallVec<[Curve; MAX_CURVES_PER_GROUP]>;
pub type ChannelSet = SmallVec<[Channel; 3]>;

#[derive(Clone, Debug)]
pub struct ChannelGroup {
    channel: Channel,
    curves: CurveList,
    generation: u64,
}

impl ChannelGroup {
    /// Roll a group size and spawn that many curves with indices `0..size`.
    pub fn spawn<R: Rng + ?Sized>(
        rng: &mut R,
        ranges: &CurveRanges,
        channel: Channel,
        now: Duration,
    ) -> Self {
        let size = math::random_int(rng, ranges.group_size.min, ranges.group_size.max) as usize;
        let size = size.clamp(1, MAX_CURVES_PER_GROUP);
        let curves = (0..size)
            .map(|i| Curve::spawn(rng, ranges, channel, i, now))
            .collect();
        Self {
            channel,
            curves,
            generation: 0,
        }
    }

    /// Wrap prebuilt curves. Their position in the list must match their
    /// `group_index`; anything beyond `MAX_CURVES_PER_GROUP` is dropped.
    pub fn from_curves(channel: Channel, curves: impl IntoIterator<Item = Curve>) -> Self {
        let curves: CurveList = curves.into_iter().take(MAX_CURVES_PER_GROUP).collect();
        debug_assert!(curves
            .iter()
            .enumerate()
            .all(|(i, c)| c.group_index() == i));
        Self {
            channel,
            curves,
            generation: 0,
        }
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn curves(&self) -> &[Curve] {
        &self.curves
    }

    pub fn size(&self) -> usize {
        self.curves.len()
    }

    /// Number of times this channel has been respawned.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn all_dead(&self) -> bool {
        self.curves.iter().all(Curve::is_dead)
    }

    fn update(&mut self, dt: Duration, global_speed: f64, dynamics: &CurveDynamics) {
        for c in self.curves.iter_mut() {
            c.update(dt, global_speed, dynamics);
        }
    }

    /// Average of member heights at `x`. Averaging keeps the merged band
    /// within the envelope of its members regardless of group size.
    pub fn evaluate_y(&self, x: f64, k: f64) -> f64 {
        let n = self.curves.len();
        if n == 0 {
            return 0.0;
        }
        let sum: f64 = self.curves.iter().map(|c| c.evaluate_y(x, n, k)).sum();
        sum / n as f64
    }
}

pub struct CurveManager {
    groups: [ChannelGroup; 3],
    rng: StdRng,
    ranges: CurveRanges,
    dynamics: CurveDynamics,
    attenuation_k: f64,
    check_interval: Duration,
    since_check: Duration,
    clock: Duration,
    show_guide: bool,
}

impl CurveManager {
    pub fn new(config: &WaveConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let groups = Channel::WAVES
            .map(|ch| ChannelGroup::spawn(&mut rng, &config.ranges, ch, Duration::ZERO));
        Self::with_rng(config, groups, rng)
    }

    /// Start from explicit groups, e.g. curves restored mid-life.
    /// `groups` must be ordered red, green, blue.
    pub fn from_groups(config: &WaveConfig, groups: [ChannelGroup; 3]) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, groups, rng)
    }

    fn with_rng(config: &WaveConfig, groups: [ChannelGroup; 3], rng: StdRng) -> Self {
        debug_assert!(groups
            .iter()
            .zip(Channel::WAVES)
            .all(|(g, ch)| g.channel == ch));
        Self {
            groups,
            rng,
            ranges: config.ranges.clone(),
            dynamics: CurveDynamics {
                despawn_factor: config.despawn_factor,
                speed_factor: config.speed_factor,
            },
            attenuation_k: config.attenuation_k,
            check_interval: config.respawn_check_interval,
            since_check: Duration::ZERO,
            clock: Duration::ZERO,
            show_guide: config.show_guide,
        }
    }

    /// Update every curve, then run the respawn check if its interval has
    /// elapsed. Returns the channels that were respawned on this tick.
    pub fn tick(&mut self, dt: Duration, global_speed: f64) -> ChannelSet {
        self.clock += dt;
        for g in self.groups.iter_mut() {
            g.update(dt, global_speed, &self.dynamics);
        }
        self.since_check += dt;
        if self.since_check >= self.check_interval {
            self.since_check = Duration::ZERO;
            self.check_respawn()
        } else {
            ChannelSet::new()
        }
    }

    /// Replace every group whose curves are all dead.
    pub fn check_respawn(&mut self) -> ChannelSet {
        let mut replaced = ChannelSet::new();
        for g in self.groups.iter_mut() {
            if !g.all_dead() {
                continue;
            }
            let generation = g.generation + 1;
            *g = ChannelGroup::spawn(&mut self.rng, &self.ranges, g.channel, self.clock);
            g.generation = generation;
            log::debug!(
                "[wave] respawned {:?} gen={} size={} at {:.3}s",
                g.channel,
                generation,
                g.size(),
                self.clock.as_secs_f64()
            );
            replaced.push(g.channel);
        }
        replaced
    }

    pub fn groups(&self) -> &[ChannelGroup] {
        &self.groups
    }

    /// The group for a wave channel; `None` for the guide line.
    pub fn group(&self, channel: Channel) -> Option<&ChannelGroup> {
        match channel {
            Channel::Guide => None,
            ch => self.groups.get(ch.index()),
        }
    }

    /// Merged height of `channel` at `x`; the guide line has no curves.
    pub fn evaluate_group_y(&self, channel: Channel, x: f64) -> f64 {
        self.group(channel)
            .map(|g| g.evaluate_y(x, self.attenuation_k))
            .unwrap_or(0.0)
    }

    /// Animation time accumulated from ticks.
    pub fn clock(&self) -> Duration {
        self.clock
    }

    pub fn show_guide(&self) -> bool {
        self.show_guide
    }

    pub fn attenuation_k(&self) -> f64 {
        self.attenuation_k
    }
}
