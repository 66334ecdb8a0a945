//! Error types.
//!
//! Engine operations never fail; these errors only come from the edges
//! that touch the filesystem or parse configuration.

use thiserror::Error;

/// Errors from configuration loading and memory persistence.
#[derive(Debug, Error)]
pub enum MafiaError {
    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, MafiaError>;
