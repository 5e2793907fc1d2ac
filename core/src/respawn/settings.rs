//! Classifier tuning

use spawnwatch_types::{ChannelConfig, TimingConfig};

use super::error::SettingsError;
use super::window::MAX_WINDOW_HOURS;

/// Constants the classifier runs with. Built from the app config.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierSettings {
    /// Added to the recorded kill time before projecting forward
    pub kill_offset_minutes: i64,
    /// Hours before minimum respawn at which a boss is surfaced as upcoming
    pub early_add_hours: f64,
    /// Kills older than this many hours are ignored
    pub stale_after_hours: f64,
    /// A boss this close (in minutes) to its early-add threshold counts as soon
    pub soon_lead_minutes: i64,
    /// Channels filled in as available when nothing is known about a pair
    pub fallback_channels: Vec<String>,
}

impl ClassifierSettings {
    /// Build settings from config, rejecting spans outside `0..=MAX_WINDOW_HOURS`
    pub fn from_config(
        timing: &TimingConfig,
        channels: &ChannelConfig,
    ) -> Result<Self, SettingsError> {
        let settings = Self::build(timing, channels);
        settings.validate()?;
        Ok(settings)
    }

    fn build(timing: &TimingConfig, channels: &ChannelConfig) -> Self {
        Self {
            kill_offset_minutes: timing.kill_offset_minutes,
            early_add_hours: timing.early_add_hours,
            stale_after_hours: timing.stale_after_hours,
            soon_lead_minutes: timing.soon_lead_minutes,
            fallback_channels: channels.tracked.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let max_minutes = (MAX_WINDOW_HOURS * 60.0) as i64;

        check_hours("early_add_hours", self.early_add_hours)?;
        check_hours("stale_after_hours", self.stale_after_hours)?;
        check_minutes("kill_offset_minutes", self.kill_offset_minutes, max_minutes)?;
        check_minutes("soon_lead_minutes", self.soon_lead_minutes, max_minutes)?;
        Ok(())
    }
}

fn check_hours(field: &'static str, value: f64) -> Result<(), SettingsError> {
    let reason = if !value.is_finite() {
        "must be a finite number"
    } else if value < 0.0 {
        "must not be negative"
    } else if value > MAX_WINDOW_HOURS {
        "must not exceed one year"
    } else {
        return Ok(());
    };
    Err(SettingsError {
        field,
        value: value.to_string(),
        reason,
    })
}

fn check_minutes(field: &'static str, value: i64, max: i64) -> Result<(), SettingsError> {
    if (0..=max).contains(&value) {
        return Ok(());
    }
    Err(SettingsError {
        field,
        value: value.to_string(),
        reason: "must be between zero and one year",
    })
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self::build(&TimingConfig::default(), &ChannelConfig::default())
    }
}
