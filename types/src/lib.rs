//! Shared configuration types for spawnwatch
//!
//! This crate contains serializable configuration types that are shared between
//! the core tracker (spawnwatch-core) and the REPL front end.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Respawn Windows
// ─────────────────────────────────────────────────────────────────────────────

/// Minimum and maximum hours after a kill during which a boss may reappear.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RespawnWindow {
    pub min_hours: f64,
    pub max_hours: f64,
}

impl RespawnWindow {
    pub const fn new(min_hours: f64, max_hours: f64) -> Self {
        Self {
            min_hours,
            max_hours,
        }
    }
}

/// Window applied to bosses that have no entry in the policy table.
pub const DEFAULT_RESPAWN_WINDOW: RespawnWindow = RespawnWindow::new(24.0, 32.0);

impl Default for RespawnWindow {
    fn default() -> Self {
        DEFAULT_RESPAWN_WINDOW
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Timing
// ─────────────────────────────────────────────────────────────────────────────

/// Constants that drive the respawn classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Minutes added to a recorded kill time to compensate for reporting lag
    #[serde(default = "default_kill_offset_minutes")]
    pub kill_offset_minutes: i64,

    /// Hours before minimum respawn at which a boss is surfaced as upcoming
    #[serde(default = "default_early_add_hours")]
    pub early_add_hours: f64,

    /// Kills older than this are not projected forward
    #[serde(default = "default_stale_after_hours")]
    pub stale_after_hours: f64,

    /// How far ahead of the early-add threshold a boss already counts as "soon"
    #[serde(default = "default_soon_lead_minutes")]
    pub soon_lead_minutes: i64,

    /// Seconds between periodic reclassification passes
    #[serde(default = "default_tick_interval_secs")]
    pub tick_interval_secs: u64,
}

fn default_kill_offset_minutes() -> i64 {
    5
}
fn default_early_add_hours() -> f64 {
    6.0
}
fn default_stale_after_hours() -> f64 {
    48.0
}
fn default_soon_lead_minutes() -> i64 {
    360
}
fn default_tick_interval_secs() -> u64 {
    30
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            kill_offset_minutes: default_kill_offset_minutes(),
            early_add_hours: default_early_add_hours(),
            stale_after_hours: default_stale_after_hours(),
            soon_lead_minutes: default_soon_lead_minutes(),
            tick_interval_secs: default_tick_interval_secs(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Channels
// ─────────────────────────────────────────────────────────────────────────────

/// Channel universe.
///
/// `tracked` is the set the status board fills in as available when nothing
/// is known about a pair. `valid` is the set accepted on incoming records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelConfig {
    #[serde(default = "default_tracked_channels")]
    pub tracked: Vec<String>,
    #[serde(default = "default_valid_channels")]
    pub valid: Vec<String>,
}

fn channel_labels(numbers: &[u8]) -> Vec<String> {
    numbers.iter().map(|n| n.to_string()).collect()
}

fn default_tracked_channels() -> Vec<String> {
    channel_labels(&[1, 2, 3, 4, 5, 10, 11, 12, 13])
}

fn default_valid_channels() -> Vec<String> {
    channel_labels(&[1, 2, 3, 4, 5, 6, 9, 10, 11, 12, 13])
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            tracked: default_tracked_channels(),
            valid: default_valid_channels(),
        }
    }
}

impl ChannelConfig {
    /// Check whether a record may carry this channel label
    pub fn is_valid(&self, channel: &str) -> bool {
        self.valid.iter().any(|c| c == channel)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Discord
// ─────────────────────────────────────────────────────────────────────────────

/// Discord webhook settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscordConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub webhook_url: String,
    #[serde(default = "default_webhook_username")]
    pub username: String,
    /// Post when a pair enters the "soon" state
    #[serde(default = "default_true")]
    pub notify_soon: bool,
    /// Post when a pair becomes available
    #[serde(default = "default_true")]
    pub notify_available: bool,
}

fn default_true() -> bool {
    true
}

fn default_webhook_username() -> String {
    "spawnwatch".to_string()
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            webhook_url: String::new(),
            username: default_webhook_username(),
            notify_soon: true,
            notify_available: true,
        }
    }
}

impl DiscordConfig {
    /// True when a webhook is configured and switched on
    pub fn is_active(&self) -> bool {
        self.enabled && !self.webhook_url.trim().is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// App Config
// ─────────────────────────────────────────────────────────────────────────────

/// Top-level application configuration.
///
/// Note: Persistence methods (load/save) are provided by spawnwatch-core via the
/// `AppConfigExt` trait, as they require platform-specific dependencies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// TOML file holding the respawn policy table
    #[serde(default)]
    pub policy_file: String,
    /// JSON file the record book is persisted to
    #[serde(default)]
    pub records_file: String,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub channels: ChannelConfig,
    #[serde(default)]
    pub discord: DiscordConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::with_paths(String::new(), String::new())
    }
}

impl AppConfig {
    /// Create a new AppConfig with the given data file locations.
    /// Other fields use their default values.
    pub fn with_paths(policy_file: String, records_file: String) -> Self {
        Self {
            policy_file,
            records_file,
            timing: TimingConfig::default(),
            channels: ChannelConfig::default(),
            discord: DiscordConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracked_channels_skip_six_and_nine() {
        let channels = ChannelConfig::default();
        assert_eq!(channels.tracked.len(), 9);
        assert!(!channels.tracked.iter().any(|c| c == "6" || c == "9"));
        assert!(channels.is_valid("6"));
        assert!(channels.is_valid("9"));
        assert!(!channels.is_valid("7"));
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
policy_file = "respawn.toml"

[timing]
early_add_hours = 4.0
"#,
        )
        .expect("Failed to parse TOML");

        assert_eq!(config.policy_file, "respawn.toml");
        assert_eq!(config.timing.early_add_hours, 4.0);
        assert_eq!(config.timing.kill_offset_minutes, 5);
        assert_eq!(config.timing.tick_interval_secs, 30);
        assert!(!config.discord.is_active());
    }

    #[test]
    fn discord_requires_url() {
        let mut discord = DiscordConfig {
            enabled: true,
            ..Default::default()
        };
        assert!(!discord.is_active());

        discord.webhook_url = "https://discord.com/api/webhooks/1/abc".to_string();
        assert!(discord.is_active());
    }
}
