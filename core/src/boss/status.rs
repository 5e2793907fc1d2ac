//! Computed respawn status per (boss, channel)

use serde::{Deserialize, Serialize};

use super::record::PairKey;

/// Respawn state shown on the status board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BossStatus {
    Available,
    Soon,
    Waiting,
    /// Never produced by the classifier; kept so input tags map onto output
    Deleted,
}

impl BossStatus {
    /// Ordering used on the board: available first, deleted last
    pub fn rank(&self) -> u8 {
        match self {
            BossStatus::Available => 0,
            BossStatus::Soon => 1,
            BossStatus::Waiting => 2,
            BossStatus::Deleted => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BossStatus::Available => "available",
            BossStatus::Soon => "soon",
            BossStatus::Waiting => "waiting",
            BossStatus::Deleted => "deleted",
        }
    }
}

impl std::str::FromStr for BossStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "available" => Ok(BossStatus::Available),
            "soon" => Ok(BossStatus::Soon),
            "waiting" => Ok(BossStatus::Waiting),
            "deleted" => Ok(BossStatus::Deleted),
            other => Err(format!("unknown status '{other}'")),
        }
    }
}

/// One entry on the status board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BossStatusInfo {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,

    pub status: BossStatus,

    /// Minutes until the next threshold; absent when available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_remaining: Option<i64>,

    /// Adjusted kill time (RFC 3339) the projection was computed from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_kill_time: Option<String>,
}

impl BossStatusInfo {
    /// Pair with no known kill and no pending record
    pub fn available(name: &str, channel: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            channel: channel.map(str::to_string),
            status: BossStatus::Available,
            time_remaining: None,
            last_kill_time: None,
        }
    }

    pub fn key(&self) -> PairKey {
        PairKey::new(&self.name, self.channel.as_deref())
    }

    pub fn channel_label(&self) -> &str {
        self.channel.as_deref().unwrap_or("")
    }

    /// Board ordering: status rank, then name, then channel label
    pub fn board_order(&self, other: &Self) -> std::cmp::Ordering {
        self.status
            .rank()
            .cmp(&other.status.rank())
            .then_with(|| self.name.cmp(&other.name))
            .then_with(|| self.channel_label().cmp(other.channel_label()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Ordering;

    #[test]
    fn status_rank_order() {
        assert!(BossStatus::Available.rank() < BossStatus::Soon.rank());
        assert!(BossStatus::Soon.rank() < BossStatus::Waiting.rank());
        assert!(BossStatus::Waiting.rank() < BossStatus::Deleted.rank());
    }

    #[test]
    fn board_order_puts_missing_channel_first() {
        let a = BossStatusInfo::available("Nix", None);
        let b = BossStatusInfo::available("Nix", Some("1"));
        assert_eq!(a.board_order(&b), Ordering::Less);
    }

    #[test]
    fn board_order_compares_channels_as_text() {
        let ten = BossStatusInfo::available("Nix", Some("10"));
        let two = BossStatusInfo::available("Nix", Some("2"));
        assert_eq!(ten.board_order(&two), Ordering::Less);
    }

    #[test]
    fn available_omits_optional_fields_in_json() {
        let info = BossStatusInfo::available("Nix", Some("1"));
        let json = serde_json::to_string(&info).unwrap();
        assert_eq!(json, r#"{"name":"Nix","channel":"1","status":"available"}"#);
    }

    #[test]
    fn parses_status_names() {
        assert_eq!("Soon".parse::<BossStatus>(), Ok(BossStatus::Soon));
        assert!("later".parse::<BossStatus>().is_err());
    }
}
