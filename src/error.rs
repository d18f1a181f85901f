//! Unified error type for the crate.
//!
//! Scoring itself never fails: empty routes and empty histories have
//! defined values. Errors come from input validation at the tracker
//! boundary, configuration, and the storage collaborators.

use thiserror::Error;

/// Errors produced by the tracker, its configuration, and storage backends.
#[derive(Debug, Error)]
pub enum NoveltyError {
    /// The route has too few points to be recorded.
    #[error("route has {point_count} points, at least {minimum_required} required")]
    InsufficientPoints {
        point_count: usize,
        minimum_required: usize,
    },

    /// A point is non-finite or outside the valid lat/lon range.
    #[error("invalid point at index {index}: lat={latitude}, lon={longitude}")]
    InvalidPoint {
        index: usize,
        latitude: f64,
        longitude: f64,
    },

    /// The loaded history already uses the largest run id.
    #[error("no run id left after {last}")]
    IdExhausted { last: u32 },

    /// Configuration values out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[cfg(feature = "persistence")]
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, NoveltyError>;
