//! Error types for the data layer.
//!
//! All errors are propagated via [`DbError`] which wraps the underlying
//! [`mongodb`] and [`bson`] errors with additional context about which
//! operation failed.

use std::time::Duration;

/// Errors that can occur in the data layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A `MongoDB` driver operation failed.
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    /// A stored document did not decode into the expected shape.
    #[error("decode error: {0}")]
    Decode(#[from] bson::de::Error),

    /// The operation did not finish within its deadline.
    #[error("store operation timed out after {0:?}")]
    Timeout(Duration),

    /// The store answered with something other than what was asked for.
    #[error("unexpected store response: {0}")]
    Unexpected(String),

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}
