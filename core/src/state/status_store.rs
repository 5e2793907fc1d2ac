//! Status store
//!
//! `StatusStore` bridges the record snapshot and the status board: every
//! refresh or tick reruns the classifier and reports what moved.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::boss::{BossRecord, BossStatus, BossStatusInfo, PairKey};
use crate::respawn::{ClassifierSettings, RespawnPolicy, classify};

/// A pair whose board status differs between two classification passes.
///
/// `None` on either side means the pair was not on the board (usually
/// because a pending record hid it).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub key: PairKey,
    pub previous: Option<BossStatus>,
    pub current: Option<BossStatus>,
    /// Minutes remaining on the new entry, if any
    pub time_remaining: Option<i64>,
}

impl StatusChange {
    /// True when the pair just entered `status`
    pub fn entered(&self, status: BossStatus) -> bool {
        self.current == Some(status) && self.previous != Some(status)
    }
}

/// Holds the latest record snapshot and the status board derived from it.
///
/// The board is replaced wholesale on every pass; readers hold an `Arc` to a
/// complete list and never see a half-built one.
#[derive(Debug, Clone)]
pub struct StatusStore {
    policy: Arc<RespawnPolicy>,
    settings: ClassifierSettings,
    records: Vec<BossRecord>,
    statuses: Arc<Vec<BossStatusInfo>>,
    last_classified: Option<DateTime<Utc>>,
}

impl StatusStore {
    pub fn new(policy: Arc<RespawnPolicy>, settings: ClassifierSettings) -> Self {
        Self {
            policy,
            settings,
            records: Vec::new(),
            statuses: Arc::new(Vec::new()),
            last_classified: None,
        }
    }

    // --- Accessors ---

    /// The current status board
    pub fn current_statuses(&self) -> Arc<Vec<BossStatusInfo>> {
        Arc::clone(&self.statuses)
    }

    /// The record snapshot the board was computed from
    pub fn records(&self) -> &[BossRecord] {
        &self.records
    }

    pub fn policy(&self) -> &RespawnPolicy {
        &self.policy
    }

    pub fn settings(&self) -> &ClassifierSettings {
        &self.settings
    }

    /// Time of the last classification pass (None before the first)
    pub fn last_classified(&self) -> Option<DateTime<Utc>> {
        self.last_classified
    }

    // --- Updates ---

    /// Replace the record snapshot and reclassify
    pub fn refresh(&mut self, records: Vec<BossRecord>, now: DateTime<Utc>) -> Vec<StatusChange> {
        self.records = records;
        self.reclassify(now)
    }

    /// Reclassify the current snapshot at a new point in time
    pub fn tick(&mut self, now: DateTime<Utc>) -> Vec<StatusChange> {
        self.reclassify(now)
    }

    /// Swap in a reloaded policy table and reclassify
    pub fn replace_policy(&mut self, policy: Arc<RespawnPolicy>, now: DateTime<Utc>) -> Vec<StatusChange> {
        self.policy = policy;
        self.reclassify(now)
    }

    /// Swap in new classifier settings and reclassify
    pub fn replace_settings(&mut self, settings: ClassifierSettings, now: DateTime<Utc>) -> Vec<StatusChange> {
        self.settings = settings;
        self.reclassify(now)
    }

    fn reclassify(&mut self, now: DateTime<Utc>) -> Vec<StatusChange> {
        let board = Arc::new(classify(&self.records, now, &self.policy, &self.settings));
        let previous = std::mem::replace(&mut self.statuses, board);
        let first_pass = self.last_classified.is_none();
        self.last_classified = Some(now);

        if first_pass {
            return Vec::new();
        }

        let changes = diff_boards(&previous, &self.statuses);
        if !changes.is_empty() {
            tracing::debug!(changes = changes.len(), "Status board changed");
        }
        changes
    }
}

/// Pairs whose status differs between two boards, in new-board order
/// followed by pairs that dropped off.
fn diff_boards(previous: &[BossStatusInfo], current: &[BossStatusInfo]) -> Vec<StatusChange> {
    let mut before: HashMap<PairKey, BossStatus> =
        previous.iter().map(|e| (e.key(), e.status)).collect();

    let mut changes = Vec::new();
    for entry in current {
        let key = entry.key();
        let old = before.remove(&key);
        if old != Some(entry.status) {
            changes.push(StatusChange {
                key,
                previous: old,
                current: Some(entry.status),
                time_remaining: entry.time_remaining,
            });
        }
    }

    let mut dropped: Vec<(PairKey, BossStatus)> = before.into_iter().collect();
    dropped.sort_by(|a, b| a.0.cmp(&b.0));
    changes.extend(dropped.into_iter().map(|(key, status)| StatusChange {
        key,
        previous: Some(status),
        current: None,
        time_remaining: None,
    }));

    changes
}
