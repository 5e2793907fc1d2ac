//! Error types for respawn policy loading

use std::path::PathBuf;
use thiserror::Error;

/// Errors during policy table loading
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("failed to read policy file {path}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse policy TOML in {path}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to read policy directory {path}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid respawn window for '{name}' in {path}: {reason}")]
    InvalidWindow {
        path: PathBuf,
        name: String,
        reason: String,
    },

    #[error("boss '{name}' is defined more than once (second time in {path})")]
    DuplicateBoss { path: PathBuf, name: String },
}

/// Timing values that would put classification thresholds out of range
#[derive(Debug, Error)]
#[error("invalid timing setting {field} = {value}: {reason}")]
pub struct SettingsError {
    pub field: &'static str,
    pub value: String,
    pub reason: &'static str,
}
