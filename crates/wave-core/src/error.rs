use thiserror::Error;

/// Errors surfaced by the waveform core.
///
/// Nothing here is raised mid-frame: per-frame math guards its own divisions.
/// These cover up-front configuration and GPU resource acquisition.
#[derive(Debug, Error)]
pub enum WaveError {
    #[error("invalid config `{field}`: {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: String,
    },
    #[error("gpu unavailable: {0}")]
    GpuUnavailable(String),
}

pub type Result<T> = std::result::Result<T, WaveError>;

impl WaveError {
    pub(crate) fn config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}
