use std::time::Duration;

// Shared tuning constants for the waveform core, used by both frontends.

// Domain and sampling
pub const GRAPH_X: f64 = 25.0; // half-width of the sampled x-domain
pub const SAMPLE_STEP: f64 = 0.02; // x increment between CPU polyline vertices
pub const GPU_SAMPLE_COUNT: u32 = 512; // lattice size for the shader path

// Shape
pub const AMPLITUDE_FACTOR: f64 = 0.8; // fraction of the baseline height a full band may use
pub const ATTENUATION_K: f64 = 4.0; // edge falloff constant
pub const STATIC_OFFSET_SPREAD: f64 = 4.0; // group members spread across [-4, +4]
pub const ATTENUATION_MIN_DENOMINATOR: f64 = 1e-9;

// Motion
pub const SPEED_FACTOR: f64 = 1.0; // per-curve phase advance multiplier
pub const GLOBAL_PHASE_STEP: f64 = std::f64::consts::FRAC_PI_2; // global phase per tick at speed 1
pub const DESPAWN_FACTOR: f64 = 0.02; // amplitude step per tick while fading
pub const LERP_SPEED: f64 = 0.1; // exponential smoothing factor per tick
pub const SMOOTHING_SNAP_EPSILON: f64 = 1e-6; // below this the current value snaps to target

// Scheduling
pub const TICK_RATE_HZ: f64 = 60.0;
pub const FIXED_DT: Duration = Duration::from_nanos(16_666_667);
pub const MAX_CATCH_UP_STEPS: u32 = 4; // fixed steps per host frame before dropping time
pub const RESPAWN_CHECK_INTERVAL: Duration = Duration::from_millis(100);

// Randomized curve ranges (inclusive)
pub const MAX_CURVES_PER_GROUP: usize = 5;
pub const GROUP_SIZE_RANGE: (u32, u32) = (2, 5);
pub const AMPLITUDE_RANGE: (f64, f64) = (0.3, 1.0);
pub const OFFSET_RANGE: (f64, f64) = (-3.0, 3.0);
pub const WIDTH_RANGE: (f64, f64) = (1.0, 3.0);
pub const SPEED_RANGE: (f64, f64) = (0.5, 1.0);
pub const DESPAWN_TIMEOUT_MS_RANGE: (u32, u32) = (500, 2000);

// Driver defaults
pub const DEFAULT_AMPLITUDE: f64 = 1.0;
pub const DEFAULT_SPEED: f64 = 0.2;

// Guide line
pub const GUIDE_HALF_THICKNESS_PX: f64 = 1.0;

// Channel palette (premultiplied, additive-friendly), indexed by `Channel::index`
pub const CHANNEL_COLORS: [[f32; 4]; 4] = [
    [173.0 / 255.0, 57.0 / 255.0, 76.0 / 255.0, 1.0],  // red
    [48.0 / 255.0, 220.0 / 255.0, 155.0 / 255.0, 1.0], // green
    [15.0 / 255.0, 82.0 / 255.0, 169.0 / 255.0, 1.0],  // blue
    [0.35, 0.35, 0.35, 0.35],                          // guide
];
