pub mod channel;
pub mod config;
pub mod constants;
pub mod curve;
pub mod driver;
pub mod error;
pub mod gpu;
pub mod manager;
pub mod math;
pub mod render;

pub use channel::Channel;
pub use config::{CurveRanges, Span, WaveConfig};
pub use constants::*;
pub use curve::{Curve, CurveDynamics, CurveParams, CurveStage};
pub use driver::{AnimationState, AnimationTargets, Driver, WaveControl};
pub use error::{Result, WaveError};
pub use manager::{ChannelGroup, CurveManager};
pub use render::{
    Band, BandSink, BlendMode, CompositeParams, CpuRenderer, FrameState, Side, Viewport,
    WaveRenderer,
};
