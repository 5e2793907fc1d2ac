//! Tests for StatusStore refresh/tick behaviour

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::boss::{BossRecord, BossStatus, PairKey, RecordStatus};
use crate::respawn::{ClassifierSettings, RespawnPolicy};
use super::StatusStore;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
}

fn store() -> StatusStore {
    let policy = RespawnPolicy::new().with_boss("Nix", 48.0, 60.0);
    StatusStore::new(Arc::new(policy), ClassifierSettings::default())
}

fn nix_kill(channel: &str, at: DateTime<Utc>) -> BossRecord {
    BossRecord::new("Nix", Some(channel.to_string()), RecordStatus::Killed, at)
}

#[test]
fn test_new_store_is_empty_until_first_pass() {
    let store = store();
    assert!(store.current_statuses().is_empty());
    assert!(store.last_classified().is_none());
}

#[test]
fn test_first_refresh_reports_no_changes() {
    let mut store = store();
    let changes = store.refresh(Vec::new(), t0());

    assert!(changes.is_empty());
    assert_eq!(store.current_statuses().len(), 9);
    assert_eq!(store.last_classified(), Some(t0()));
}

#[test]
fn test_refresh_reports_kill() {
    let mut store = store();
    store.refresh(Vec::new(), t0());

    let changes = store.refresh(vec![nix_kill("3", t0())], t0());
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].key, PairKey::new("Nix", Some("3")));
    assert_eq!(changes[0].previous, Some(BossStatus::Available));
    assert_eq!(changes[0].current, Some(BossStatus::Waiting));
    assert!(changes[0].entered(BossStatus::Waiting));
}

#[test]
fn test_tick_crosses_thresholds_without_new_records() {
    let mut store = store();
    store.refresh(vec![nix_kill("1", t0())], t0());
    assert_eq!(store.records().len(), 1);

    // Early-add lead window opens 36h05m after the kill
    let changes = store.tick(t0() + Duration::hours(37));
    assert_eq!(changes.len(), 1);
    assert!(changes[0].entered(BossStatus::Soon));

    // Nothing moves between two soon ticks
    assert!(store.tick(t0() + Duration::hours(40)).is_empty());

    let changes = store.tick(t0() + Duration::hours(49));
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].previous, Some(BossStatus::Soon));
    assert!(changes[0].entered(BossStatus::Available));
    assert_eq!(changes[0].time_remaining, None);
}

#[test]
fn test_pending_record_drops_pair_from_board() {
    let mut store = store();
    store.refresh(Vec::new(), t0());

    let pending = BossRecord::new("Nix", Some("5".into()), RecordStatus::Pending, t0());
    let changes = store.refresh(vec![pending], t0());

    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].previous, Some(BossStatus::Available));
    assert_eq!(changes[0].current, None);
    assert_eq!(store.current_statuses().len(), 8);
}

#[test]
fn test_readers_keep_their_snapshot() {
    let mut store = store();
    store.refresh(Vec::new(), t0());
    let before = store.current_statuses();

    store.refresh(vec![nix_kill("1", t0())], t0());
    let after = store.current_statuses();

    assert!(before.iter().all(|e| e.status == BossStatus::Available));
    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(after.iter().filter(|e| e.status == BossStatus::Waiting).count(), 1);
}

#[test]
fn test_replace_policy_adds_new_bosses() {
    let mut store = store();
    store.refresh(Vec::new(), t0());

    let policy = RespawnPolicy::new()
        .with_boss("Nix", 48.0, 60.0)
        .with_boss("Frost Wyrm", 12.0, 16.0);
    let changes = store.replace_policy(Arc::new(policy), t0());

    assert_eq!(changes.len(), 9);
    assert!(changes.iter().all(|c| c.key.name == "Frost Wyrm" && c.previous.is_none()));
    assert_eq!(store.policy().len(), 2);
}

#[test]
fn test_replace_settings_changes_fallback_channels() {
    let mut store = store();
    store.refresh(Vec::new(), t0());

    let settings = ClassifierSettings {
        fallback_channels: vec!["1".into()],
        ..ClassifierSettings::default()
    };
    let changes = store.replace_settings(settings, t0());

    assert_eq!(changes.len(), 8);
    assert!(changes.iter().all(|c| c.current.is_none()));
    assert_eq!(store.settings().fallback_channels, vec!["1".to_string()]);
}
