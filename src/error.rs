//! Error types for the library.
//!
//! Recompute passes never fail; these errors cover parsing settings and
//! reading import documents.

use thiserror::Error;

/// Errors surfaced by configuration and import handling.
#[derive(Debug, Error)]
pub enum Error {
    /// A rolling-baseline or duration string could not be parsed.
    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    /// Unknown alarm basis name.
    #[error("Invalid alarm basis: {0} (expected zero, first or rolling)")]
    InvalidAlarmBasis(String),

    /// A date or date-time string could not be parsed.
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// The import document uses an incompatible schema version.
    #[error("Unsupported import schema version {0}")]
    UnsupportedSchema(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;
