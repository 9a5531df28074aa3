//! Animation clock and the per-tick schedule.
//!
//! Each tick, in order: smooth amplitude/speed toward their targets, tick the
//! curve manager (curve updates plus the throttled respawn check), advance
//! the global phase, then hand a read-only frame to exactly one renderer.
//! The driver never reads a wall clock; hosts feed it `dt`.

use crate::config::WaveConfig;
use crate::constants::{FIXED_DT, GLOBAL_PHASE_STEP, MAX_CATCH_UP_STEPS, SMOOTHING_SNAP_EPSILON};
use crate::error::Result;
use crate::manager::CurveManager;
use crate::math;
use crate::render::{FrameState, Viewport, WaveRenderer};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Values requested by the host; the driver eases toward them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationTargets {
    pub amplitude: f64,
    pub speed: f64,
}

/// Smoothed animation values owned by one driver.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationState {
    pub amplitude: f64,
    pub speed: f64,
    pub targets: AnimationTargets,
    /// Global phase in `[0, 2π)`.
    pub phase: f64,
}

impl AnimationState {
    pub fn new(amplitude: f64, speed: f64) -> Self {
        Self {
            amplitude,
            speed,
            targets: AnimationTargets { amplitude, speed },
            phase: 0.0,
        }
    }

    /// One exponential-smoothing step toward the current targets.
    pub fn smooth(&mut self, t: f64) {
        self.amplitude = smooth_toward(self.amplitude, self.targets.amplitude, t);
        self.speed = smooth_toward(self.speed, self.targets.speed, t);
    }

    pub fn advance_phase(&mut self) {
        self.phase = math::normalize_phase(self.phase + GLOBAL_PHASE_STEP * self.speed);
    }
}

#[inline]
fn smooth_toward(current: f64, target: f64, t: f64) -> f64 {
    let next = math::lerp(current, target, t);
    if (next - target).abs() < SMOOTHING_SNAP_EPSILON {
        target
    } else {
        next
    }
}

/// Clamp public input: negative and non-finite values become 0.
fn sanitize(what: &str, value: f64) -> f64 {
    if !value.is_finite() {
        log::warn!("[wave] ignoring non-finite {what} {value}, using 0");
        return 0.0;
    }
    value.max(0.0)
}

/// Cloneable handle for setting targets from any thread.
#[derive(Clone, Debug)]
pub struct WaveControl {
    targets: Arc<Mutex<AnimationTargets>>,
}

impl WaveControl {
    fn new(targets: AnimationTargets) -> Self {
        Self {
            targets: Arc::new(Mutex::new(targets)),
        }
    }

    pub fn set_amplitude(&self, value: f64) {
        let v = sanitize("amplitude", value);
        self.lock().amplitude = v;
    }

    pub fn set_speed(&self, value: f64) {
        let v = sanitize("speed", value);
        self.lock().speed = v;
    }

    pub fn targets(&self) -> AnimationTargets {
        *self.lock()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, AnimationTargets> {
        // Targets are two plain floats; a panic elsewhere cannot leave them torn.
        self.targets.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub struct Driver {
    config: WaveConfig,
    manager: CurveManager,
    state: AnimationState,
    control: WaveControl,
    viewport: Viewport,
    running: bool,
    accumulator: Duration,
}

impl Driver {
    /// Driver with the default configuration.
    pub fn new(viewport: Viewport) -> Self {
        Self::build(WaveConfig::default(), viewport)
    }

    pub fn with_config(config: WaveConfig, viewport: Viewport) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, viewport))
    }

    /// Size to a host area and optionally start right away.
    pub fn create(viewport: Viewport, auto_start: bool) -> Self {
        let mut d = Self::new(viewport);
        if auto_start {
            d.start();
        }
        d
    }

    fn build(config: WaveConfig, viewport: Viewport) -> Self {
        let manager = CurveManager::new(&config);
        let state = AnimationState::new(config.initial_amplitude, config.initial_speed);
        let control = WaveControl::new(state.targets);
        Self {
            config,
            manager,
            state,
            control,
            viewport,
            running: false,
            accumulator: Duration::ZERO,
        }
    }

    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.accumulator = Duration::ZERO;
        log::info!("[wave] started");
    }

    /// Freeze the animation; the last frame stays as drawn.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.accumulator = Duration::ZERO;
        log::info!("[wave] stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Current smoothed amplitude.
    pub fn amplitude(&self) -> f64 {
        self.state.amplitude
    }

    /// Current smoothed speed.
    pub fn speed(&self) -> f64 {
        self.state.speed
    }

    pub fn phase(&self) -> f64 {
        self.state.phase
    }

    pub fn set_amplitude(&self, value: f64) {
        self.control.set_amplitude(value);
    }

    pub fn set_speed(&self, value: f64) {
        self.control.set_speed(value);
    }

    pub fn control(&self) -> WaveControl {
        self.control.clone()
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        if viewport.is_empty() {
            return;
        }
        self.viewport = viewport;
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn config(&self) -> &WaveConfig {
        &self.config
    }

    pub fn manager(&self) -> &CurveManager {
        &self.manager
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    fn step(&mut self, dt: Duration) {
        self.state.targets = self.control.targets();
        self.state.smooth(self.config.lerp_speed);
        self.manager.tick(dt, self.state.speed);
        self.state.advance_phase();
    }

    /// Snapshot of the current state, e.g. to repaint a frozen frame after a
    /// resize.
    pub fn frame(&self) -> FrameState<'_> {
        FrameState {
            manager: &self.manager,
            amplitude: self.state.amplitude,
            phase: self.state.phase,
            viewport: self.viewport,
        }
    }

    fn render<R: WaveRenderer + ?Sized>(&self, renderer: &mut R) {
        renderer.render(&self.frame());
    }

    /// Run one tick of `dt` and one render pass. Returns `false` (and does
    /// nothing) while stopped.
    pub fn tick<R: WaveRenderer + ?Sized>(&mut self, dt: Duration, renderer: &mut R) -> bool {
        if !self.running {
            return false;
        }
        self.step(dt);
        self.render(renderer);
        true
    }

    /// Feed a variable host frame interval. Runs whole fixed steps (at most
    /// `MAX_CATCH_UP_STEPS`) and renders once after the last one. Returns the
    /// number of steps taken.
    pub fn advance<R: WaveRenderer + ?Sized>(&mut self, elapsed: Duration, renderer: &mut R) -> u32 {
        if !self.running {
            return 0;
        }
        self.accumulator += elapsed;
        let mut steps = 0;
        while self.accumulator >= FIXED_DT && steps < MAX_CATCH_UP_STEPS {
            self.accumulator -= FIXED_DT;
            self.step(FIXED_DT);
            steps += 1;
        }
        if self.accumulator >= FIXED_DT {
            log::trace!(
                "[wave] dropping {:.1}ms of frame time",
                self.accumulator.as_secs_f64() * 1000.0
            );
            self.accumulator = Duration::ZERO;
        }
        if steps > 0 {
            self.render(renderer);
        }
        steps
    }
}
