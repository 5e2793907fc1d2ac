//! Boss records as kept by the guild's record book
//!
//! A record is one spawn-tracking card: a boss in a channel that is either
//! expected to spawn (`Pending`), was killed, did not show up, or was removed.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::TimestampError;

/// Lifecycle tag set by record book actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Pending,
    Killed,
    Noshow,
    Deleted,
}

impl RecordStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RecordStatus::Pending => "pending",
            RecordStatus::Killed => "killed",
            RecordStatus::Noshow => "noshow",
            RecordStatus::Deleted => "deleted",
        }
    }
}

/// One spawn-tracking card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BossRecord {
    /// Assigned by the record book; 0 for records supplied from elsewhere
    #[serde(default)]
    pub id: u64,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,

    pub status: RecordStatus,

    /// Kill time for `Killed`, expected spawn time for `Pending` (ISO-8601)
    pub spawn_time: String,
}

impl BossRecord {
    pub fn new(
        name: impl Into<String>,
        channel: Option<String>,
        status: RecordStatus,
        spawn_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: 0,
            name: name.into(),
            map: None,
            channel,
            status,
            spawn_time: format_timestamp(spawn_time),
        }
    }

    /// Parse `spawn_time` into a UTC timestamp
    pub fn parsed_spawn_time(&self) -> Result<DateTime<Utc>, TimestampError> {
        parse_timestamp(&self.spawn_time)
    }

    /// The (name, channel) pair this record tracks
    pub fn key(&self) -> PairKey {
        PairKey::new(&self.name, self.channel.as_deref())
    }

    pub fn is_pending(&self) -> bool {
        self.status == RecordStatus::Pending
    }
}

/// Identity of a tracked (boss, channel) combination
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey {
    pub name: String,
    pub channel: Option<String>,
}

impl PairKey {
    pub fn new(name: &str, channel: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            channel: channel.map(str::to_string),
        }
    }

    /// Channel label for display and ordering, empty when unassigned
    pub fn channel_label(&self) -> &str {
        self.channel.as_deref().unwrap_or("")
    }
}

impl std::fmt::Display for PairKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.channel {
            Some(ch) => write!(f, "{} (ch {})", self.name, ch),
            None => write!(f, "{}", self.name),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Timestamps
// ═══════════════════════════════════════════════════════════════════════════

/// Naive layouts accepted in addition to RFC 3339; interpreted as UTC
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

/// Parse an ISO-8601 timestamp.
///
/// Offsets are honored; timestamps without an offset are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, TimestampError> {
    let trimmed = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| TimestampError {
            raw: raw.to_string(),
        })
}

/// Canonical RFC 3339 rendering used for stored records
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_browser_iso_strings() {
        let ts = parse_timestamp("2025-03-01T12:30:00.000Z").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2025, 3, 1, 12, 30, 0).unwrap());
    }

    #[test]
    fn honors_offsets() {
        let ts = parse_timestamp("2025-03-01T21:30:00+09:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2025, 3, 1, 12, 30, 0).unwrap());
    }

    #[test]
    fn naive_input_is_utc() {
        let ts = parse_timestamp("2025-03-01T12:30").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2025, 3, 1, 12, 30, 0).unwrap());
    }

    #[test]
    fn rejects_garbage() {
        let err = parse_timestamp("yesterday").unwrap_err();
        assert_eq!(err.raw, "yesterday");
    }

    #[test]
    fn record_json_uses_camel_case() {
        let json = r#"{"name":"Nix","channel":"3","status":"killed","spawnTime":"2025-03-01T12:30:00Z"}"#;
        let record: BossRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, 0);
        assert_eq!(record.status, RecordStatus::Killed);
        assert_eq!(record.key(), PairKey::new("Nix", Some("3")));
        assert!(record.parsed_spawn_time().is_ok());
    }

    #[test]
    fn pair_key_display() {
        assert_eq!(PairKey::new("Nix", Some("3")).to_string(), "Nix (ch 3)");
        assert_eq!(PairKey::new("Nix", None).to_string(), "Nix");
    }
}
