//! Error types for configuration validation and the frame runner

use crate::game::host::HostError;
use crate::game::state::TileKind;

/// Configuration problems detected at startup
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} tile pool is empty")]
    EmptyPool(TileKind),
    #[error("tiles_per_row must be at least 1")]
    ZeroLaneWidth,
    #[error("look smoothing window must be at least 1 frame")]
    ZeroSmoothingWindow,
    #[error("invalid clamp range for {axis}: min {min} > max {max}")]
    InvertedClamp { axis: &'static str, min: f32, max: f32 },
    #[error("{name} must be finite and non-negative, got {value}")]
    InvalidScalar { name: &'static str, value: f32 },
    #[error("camera reference is not bound")]
    CameraUnbound,
    #[error("player controller reference is not bound")]
    PlayerUnbound,
}

/// Errors surfaced by the lane runner
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("host error: {0}")]
    Host(#[from] HostError),
    #[error("runner stepped before initialize()")]
    NotInitialized,
}
