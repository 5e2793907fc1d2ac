//! Respawn time windows derived from a single kill

use chrono::{DateTime, Duration, Utc};
use spawnwatch_types::RespawnWindow;

use super::ClassifierSettings;

/// Largest respawn window or timing span accepted from configuration (one year)
pub const MAX_WINDOW_HOURS: f64 = 24.0 * 365.0;

/// Convert fractional hours to a duration (millisecond precision).
/// `None` when the value is not finite or does not fit a `Duration`.
pub fn hours(h: f64) -> Option<Duration> {
    let ms = (h * 3_600_000.0).round();
    if !ms.is_finite() || ms.abs() >= i64::MAX as f64 {
        return None;
    }
    Duration::try_milliseconds(ms as i64)
}

/// Whole minutes from `now` until `target`, truncated toward zero.
/// Negative once `target` has passed.
pub fn minutes_until(now: DateTime<Utc>, target: DateTime<Utc>) -> i64 {
    target.signed_duration_since(now).num_minutes()
}

/// Thresholds for one (boss, channel) after an observed kill
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RespawnTimeline {
    /// Recorded kill time plus the reporting offset
    pub last_kill: DateTime<Utc>,
    /// Earliest time the boss can be back
    pub min_respawn: DateTime<Utc>,
    /// Time by which the boss is guaranteed to be back
    pub max_respawn: DateTime<Utc>,
    /// Time from which the boss is surfaced as upcoming
    pub early_add: DateTime<Utc>,
}

impl RespawnTimeline {
    /// Project a kill forward. `None` if any threshold falls outside the
    /// representable time range.
    pub fn from_kill(
        killed_at: DateTime<Utc>,
        window: RespawnWindow,
        settings: &ClassifierSettings,
    ) -> Option<Self> {
        let last_kill =
            killed_at.checked_add_signed(Duration::try_minutes(settings.kill_offset_minutes)?)?;
        let after_kill = |h: f64| hours(h).and_then(|d| last_kill.checked_add_signed(d));

        Some(Self {
            last_kill,
            min_respawn: after_kill(window.min_hours)?,
            max_respawn: after_kill(window.max_hours)?,
            early_add: after_kill(window.min_hours - settings.early_add_hours)?,
        })
    }

    pub fn minutes_until_min_respawn(&self, now: DateTime<Utc>) -> i64 {
        minutes_until(now, self.min_respawn)
    }

    pub fn minutes_until_early_add(&self, now: DateTime<Utc>) -> i64 {
        minutes_until(now, self.early_add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn timeline_applies_offset_and_window() {
        let timeline = RespawnTimeline::from_kill(
            t0(),
            RespawnWindow::new(24.0, 32.0),
            &ClassifierSettings::default(),
        )
        .unwrap();

        let last_kill = t0() + Duration::minutes(5);
        assert_eq!(timeline.last_kill, last_kill);
        assert_eq!(timeline.min_respawn, last_kill + Duration::hours(24));
        assert_eq!(timeline.max_respawn, last_kill + Duration::hours(32));
        assert_eq!(timeline.early_add, last_kill + Duration::hours(18));
    }

    #[test]
    fn fractional_hours() {
        assert_eq!(hours(1.5), Some(Duration::minutes(90)));
        assert_eq!(hours(-2.0), Some(Duration::hours(-2)));
    }

    #[test]
    fn out_of_range_hours_are_rejected() {
        assert_eq!(hours(f64::NAN), None);
        assert_eq!(hours(f64::INFINITY), None);
        assert_eq!(hours(1e16), None);
    }

    #[test]
    fn timeline_overflow_is_none() {
        let huge = RespawnWindow::new(1e12, 1e12);
        assert!(RespawnTimeline::from_kill(t0(), huge, &ClassifierSettings::default()).is_none());

        let settings = ClassifierSettings {
            kill_offset_minutes: i64::MAX,
            ..ClassifierSettings::default()
        };
        assert!(
            RespawnTimeline::from_kill(t0(), RespawnWindow::new(24.0, 32.0), &settings).is_none()
        );
    }

    #[test]
    fn minutes_truncate_toward_zero() {
        let now = t0();
        assert_eq!(minutes_until(now, now + Duration::seconds(119)), 1);
        assert_eq!(minutes_until(now, now - Duration::seconds(30)), 0);
        assert_eq!(minutes_until(now, now - Duration::minutes(61)), -61);
    }
}
