//! Error types for configuring the animation engine.
//!
//! Planning and ticking never fail; only configuration input is validated.

use thiserror::Error;

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, AnimateError>;

/// Errors that can occur while building transition configuration.
#[derive(Error, Debug)]
pub enum AnimateError {
    /// A transition entry is unusable.
    #[error("invalid transition for `{property}`: {reason}")]
    InvalidTransition { property: String, reason: String },

    /// Tick interval must be a finite, non-negative number of milliseconds.
    #[error("invalid tick interval: {0}ms")]
    InvalidInterval(f64),

    /// Configuration JSON could not be parsed.
    #[error("failed to parse transition config: {0}")]
    Json(#[from] serde_json::Error),
}
