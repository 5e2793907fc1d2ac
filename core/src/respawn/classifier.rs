//! Respawn status classification
//!
//! Decides, for every tracked (boss, channel), whether the boss is available,
//! coming up soon, or still a while away.
//!
//! # Rules
//!
//! 1. Only the latest non-stale kill per pair is projected forward
//! 2. Pairs with a pending record are left off the board
//! 3. Every policy boss on every tracked channel without data is available
//! 4. The board is ordered by status, then name, then channel

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::boss::{BossRecord, BossStatus, BossStatusInfo, PairKey, RecordStatus, format_timestamp};

use super::window::hours;
use super::{ClassifierSettings, RespawnPolicy, RespawnTimeline};

/// Classify the status board at `now`.
///
/// Killed records with an unparseable spawn time, or whose respawn window
/// cannot be projected, are skipped and logged; the affected pair falls back
/// to available.
pub fn classify(
    bosses: &[BossRecord],
    now: DateTime<Utc>,
    policy: &RespawnPolicy,
    settings: &ClassifierSettings,
) -> Vec<BossStatusInfo> {
    let pending: HashSet<PairKey> = bosses
        .iter()
        .filter(|b| b.is_pending())
        .map(BossRecord::key)
        .collect();

    // A cutoff before the earliest representable time means nothing is stale
    let stale_cutoff = hours(settings.stale_after_hours).and_then(|d| now.checked_sub_signed(d));
    if stale_cutoff.is_none() {
        tracing::warn!(
            stale_after_hours = settings.stale_after_hours,
            "Stale cutoff out of range, keeping all kills"
        );
    }

    let mut kills: Vec<(DateTime<Utc>, &BossRecord, RespawnTimeline)> = bosses
        .iter()
        .filter(|b| b.status == RecordStatus::Killed)
        .filter_map(|record| match record.parsed_spawn_time() {
            Ok(killed_at) => Some((killed_at, record)),
            Err(e) => {
                tracing::warn!(
                    record_id = record.id,
                    boss = %record.name,
                    channel = ?record.channel,
                    error = %e,
                    "Skipping killed record"
                );
                None
            }
        })
        .filter(|(killed_at, _)| stale_cutoff.is_none_or(|cutoff| *killed_at >= cutoff))
        .filter_map(|(killed_at, record)| {
            let window = policy.window_for(&record.name);
            match RespawnTimeline::from_kill(killed_at, window, settings) {
                Some(timeline) => Some((killed_at, record, timeline)),
                None => {
                    tracing::warn!(
                        record_id = record.id,
                        boss = %record.name,
                        min_hours = window.min_hours,
                        max_hours = window.max_hours,
                        "Skipping killed record, respawn window out of range"
                    );
                    None
                }
            }
        })
        .collect();

    // Newest first so the first kill seen per pair is the latest one
    kills.sort_by(|a, b| b.0.cmp(&a.0));

    let mut processed: HashSet<PairKey> = HashSet::new();
    let mut board = Vec::new();

    for (_, record, timeline) in kills {
        let key = record.key();
        if !processed.insert(key.clone()) {
            continue;
        }
        if pending.contains(&key) {
            continue;
        }

        let (status, time_remaining) = status_at(&timeline, now, settings.soon_lead_minutes);

        board.push(BossStatusInfo {
            name: record.name.clone(),
            channel: record.channel.clone(),
            status,
            time_remaining,
            last_kill_time: Some(format_timestamp(timeline.last_kill)),
        });
    }

    for name in policy.boss_names() {
        for channel in &settings.fallback_channels {
            let key = PairKey::new(name, Some(channel.as_str()));
            if processed.contains(&key) || pending.contains(&key) {
                continue;
            }
            board.push(BossStatusInfo::available(name, Some(channel.as_str())));
        }
    }

    board.sort_by(BossStatusInfo::board_order);

    tracing::debug!(
        records = bosses.len(),
        pending = pending.len(),
        projected = processed.len(),
        entries = board.len(),
        "Classified status board"
    );

    board
}

/// Status and minutes remaining for one timeline at `now`.
///
/// First match wins:
/// - minimum respawn reached: available
/// - early-add threshold reached: soon, counting down to minimum respawn
/// - within `soon_lead_minutes` of early-add: soon, counting down to early-add
/// - otherwise: waiting, counting down to early-add
pub fn status_at(
    timeline: &RespawnTimeline,
    now: DateTime<Utc>,
    soon_lead_minutes: i64,
) -> (BossStatus, Option<i64>) {
    let until_min_respawn = timeline.minutes_until_min_respawn(now);
    let until_early_add = timeline.minutes_until_early_add(now);

    if until_min_respawn <= 0 {
        (BossStatus::Available, None)
    } else if until_early_add <= 0 {
        (BossStatus::Soon, Some(until_min_respawn))
    } else if until_early_add <= soon_lead_minutes {
        (BossStatus::Soon, Some(until_early_add))
    } else {
        (BossStatus::Waiting, Some(until_early_add))
    }
}
