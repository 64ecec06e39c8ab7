//! Setup-time errors
//!
//! Everything here is raised before a round enters Countdown. Once a round
//! is running there are no recoverable errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown item code {code:?} at pattern position {position}")]
    UnknownKindCode { code: char, position: usize },

    #[error("round length must be at least one second")]
    NonPositiveRoundLength,

    #[error("spawn interval must be at least one millisecond")]
    NonPositiveSpawnInterval,

    #[error("fall speed must be positive and finite, got {0}")]
    InvalidFallSpeed(f32),

    #[error("play field must have positive size, got {width}x{height}")]
    InvalidField { width: f32, height: f32 },

    #[error("item size {width}x{height} does not fit the play field")]
    InvalidItemSize { width: f32, height: f32 },

    #[error("catcher {width}x{height} does not fit the play field")]
    InvalidCatcher { width: f32, height: f32 },

    #[error("spawn layout needs at least one lane")]
    NoLanes,

    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
}
