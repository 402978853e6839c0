//! Error types for mesh configuration.

use thiserror::Error;

/// A setting that cannot produce a well-formed mesh.
///
/// Every runtime operation on a built mesh is total; configuration is the
/// only place the crate can fail.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The grid needs at least one subdivision per axis.
    #[error("grid count must be positive, got {0}")]
    InvalidGridCount(i32),
    /// The extent must be positive and finite on both axes.
    #[error("extent must be positive and finite, got {width} x {height}")]
    InvalidExtent { width: f32, height: f32 },
    /// Friction must lie in (0, 1].
    #[error("friction must be in (0, 1], got {0}")]
    InvalidFriction(f32),
    #[error("force multiplier must be finite and non-negative, got {0}")]
    InvalidForceMultiplier(f32),
    #[error("knife range must be finite and non-negative, got {0}")]
    InvalidKnifeRange(f32),
    #[error("speed limit must be positive and finite, got {0}")]
    InvalidSpeedLimit(f32),
    #[error("idle threshold must be finite and non-negative, got {0} ms")]
    InvalidIdleThreshold(f64),
    #[error("node size must be finite and non-negative, got {0}")]
    InvalidNodeSize(f32),
}
