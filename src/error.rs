//! Error types for Questlog.
//!
//! Only storage and serialization can fail. Missing ids and insufficient
//! coins are ordinary outcomes and are returned as values.

use thiserror::Error;

/// Questlog error type.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backend rejected a read or write
    #[error("storage error for key '{key}': {message}")]
    Storage { key: String, message: String },

    /// Rule settings that would break the level curve
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// XP or coin amount too large to record in the history
    #[error("amount {amount} exceeds the maximum of {max}")]
    AmountOutOfRange { amount: u64, max: u64 },
}

/// Result type alias for Questlog operations.
pub type Result<T> = std::result::Result<T, Error>;
