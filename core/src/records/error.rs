//! Error types for record book operations

use std::path::PathBuf;
use thiserror::Error;

use crate::boss::RecordStatus;

/// Errors from record book writes and persistence
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("record {id} not found")]
    UnknownRecord { id: u64 },

    #[error("{pair} already has a pending record ({existing_id})")]
    DuplicatePending { pair: String, existing_id: u64 },

    #[error("channel '{channel}' is not a valid channel")]
    InvalidChannel { channel: String },

    #[error("boss name is empty")]
    EmptyName,

    #[error("cannot mark record {id} as {action}: it is {}", .from.label())]
    InvalidTransition {
        id: u64,
        from: RecordStatus,
        action: &'static str,
    },

    #[error("failed to read records file {path}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse records JSON in {path}")]
    ParseJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize records")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to write records file {path}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
