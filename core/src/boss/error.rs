//! Error types for record fields

use thiserror::Error;

/// A `spawnTime` value that is not a usable ISO-8601 timestamp
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid timestamp '{raw}'")]
pub struct TimestampError {
    pub raw: String,
}
