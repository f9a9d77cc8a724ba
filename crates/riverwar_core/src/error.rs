//! Error types for the turn-state model.

use thiserror::Error;

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

/// Top-level error type for snapshot/order errors.
///
/// Normal "can't do that this turn" outcomes (no path, no eligible
/// worker, threshold not met) are **not** errors; callers express those
/// as empty or `None` results. A `GameError` means the caller referenced
/// state that does not exist or issued an order the rules forbid.
#[derive(Debug, Error)]
pub enum GameError {
    /// Invalid unit identifier.
    #[error("Invalid unit ID: {0}")]
    InvalidUnitId(u32),

    /// Invalid tile identifier.
    #[error("Invalid tile ID: {0}")]
    InvalidTileId(u32),

    /// Invalid tower identifier.
    #[error("Invalid tower ID: {0}")]
    InvalidTowerId(u32),

    /// The map does not satisfy a structural requirement.
    #[error("Malformed map: {0}")]
    MalformedMap(String),

    /// An order violated the game rules.
    #[error("Illegal order: {0}")]
    IllegalOrder(String),

    /// Insufficient resources for a purchase.
    #[error("Insufficient resources: need {required} {resource}, have {available}")]
    InsufficientResources {
        /// Resource type.
        resource: String,
        /// Amount required.
        required: i32,
        /// Amount available.
        available: i32,
    },
}
