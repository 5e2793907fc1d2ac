//! Application configuration
//!
//! This module re-exports shared types from spawnwatch-types and provides
//! platform-specific defaults and persistence for AppConfig.

use std::path::PathBuf;

// Re-export all shared types
pub use spawnwatch_types::{AppConfig, ChannelConfig, DiscordConfig, TimingConfig};

use crate::respawn::{ClassifierSettings, SettingsError};

use super::ConfigError;

const APP_NAME: &str = "spawnwatch";
const CONFIG_NAME: &str = "config";

// ─────────────────────────────────────────────────────────────────────────────
// Platform-Specific Defaults
// ─────────────────────────────────────────────────────────────────────────────

fn default_policy_file() -> String {
    dirs::config_dir()
        .map(|p| p.join(APP_NAME).join("respawn.toml"))
        .and_then(|p| p.to_str().map(String::from))
        .unwrap_or_else(|| "respawn.toml".to_string())
}

fn default_records_file() -> String {
    dirs::data_dir()
        .map(|p| p.join(APP_NAME).join("records.json"))
        .and_then(|p| p.to_str().map(String::from))
        .unwrap_or_else(|| "records.json".to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// AppConfig Extensions
// ─────────────────────────────────────────────────────────────────────────────

/// Extension trait for AppConfig persistence and derived settings
pub trait AppConfigExt: Sized {
    fn load() -> Self;
    fn load_with_defaults() -> Self;
    fn save(self) -> Result<(), ConfigError>;
    fn fill_default_paths(&mut self);
    fn policy_path(&self) -> PathBuf;
    fn records_path(&self) -> PathBuf;
    fn classifier_settings(&self) -> Result<ClassifierSettings, SettingsError>;
}

impl AppConfigExt for AppConfig {
    fn load() -> Self {
        match confy::load::<AppConfig>(APP_NAME, CONFIG_NAME) {
            Ok(mut config) => {
                config.fill_default_paths();
                config
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load config, using defaults");
                Self::load_with_defaults()
            }
        }
    }

    /// Defaults with platform data locations (used when no config file exists)
    fn load_with_defaults() -> Self {
        AppConfig::with_paths(default_policy_file(), default_records_file())
    }

    fn save(self) -> Result<(), ConfigError> {
        confy::store(APP_NAME, CONFIG_NAME, self).map_err(ConfigError::Save)
    }

    fn fill_default_paths(&mut self) {
        if self.policy_file.trim().is_empty() {
            self.policy_file = default_policy_file();
        }
        if self.records_file.trim().is_empty() {
            self.records_file = default_records_file();
        }
    }

    fn policy_path(&self) -> PathBuf {
        PathBuf::from(&self.policy_file)
    }

    fn records_path(&self) -> PathBuf {
        PathBuf::from(&self.records_file)
    }

    fn classifier_settings(&self) -> Result<ClassifierSettings, SettingsError> {
        ClassifierSettings::from_config(&self.timing, &self.channels)
    }
}
