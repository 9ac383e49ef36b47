//! Simulation error types
//!
//! Ordinary gameplay states (no enemies, no projectiles, empty pools) are never
//! errors. These variants cover malformed data and bad configuration only.

use crate::sim::entity::EntityId;

/// Errors produced by validation entry points.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// Position, size or velocity holds NaN or infinity.
    #[error("entity {id:?} has non-finite position, size or velocity")]
    NonFiniteEntity { id: EntityId },

    /// Width or height is zero or negative.
    #[error("entity {id:?} has non-positive dimensions")]
    InvalidDimensions { id: EntityId },

    /// Enemy size tiers are 1 (small) through 3 (large).
    #[error("size level {0} is outside 1..=3")]
    InvalidSizeLevel(u8),

    /// A settings field failed validation.
    #[error("invalid config '{field}': {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },

    /// Settings JSON could not be parsed.
    #[error("failed to parse settings: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

/// Convenience alias: a `Result` using `SimError` as the error type.
pub type SimResult<T> = Result<T, SimError>;
