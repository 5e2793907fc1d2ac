use std::io::Write;

use chrono::{DateTime, Utc};
use spawnwatch_core::context::AppConfigExt;
use spawnwatch_core::notify::{DiscordNotifier, format_remaining};
use spawnwatch_core::{BossRecord, BossStatus, BossStatusInfo, parse_timestamp};

use crate::context::error_chain;
use crate::ticker::announce;
use crate::AppContext;

/// Parse a user-supplied time: `now` or an ISO-8601 timestamp
pub fn parse_when(raw: Option<&str>) -> Result<DateTime<Utc>, String> {
    match raw.map(str::trim) {
        None | Some("now") => Ok(Utc::now()),
        Some(s) => parse_timestamp(s).map_err(|e| e.to_string()),
    }
}

/// Board lines for display, optionally limited to one status
pub fn render_board(board: &[BossStatusInfo], only: Option<BossStatus>) -> Vec<String> {
    board
        .iter()
        .filter(|e| only.is_none_or(|s| e.status == s))
        .map(|e| {
            let remaining = e.time_remaining.map(format_remaining).unwrap_or_default();
            format!(
                "{:<10} {:<24} {:<4} {}",
                e.status.label(),
                e.name,
                e.channel_label(),
                remaining
            )
            .trim_end()
            .to_string()
        })
        .collect()
}

fn render_record(r: &BossRecord) -> String {
    format!(
        "{:>5} {:<8} {:<24} {:<4} {:<20} {}",
        r.id,
        r.status.label(),
        r.name,
        r.channel.as_deref().unwrap_or("-"),
        r.map.as_deref().unwrap_or("-"),
        r.spawn_time
    )
}

pub async fn show_board(ctx: &AppContext, only: Option<BossStatus>) -> Result<(), String> {
    let board = ctx.store.read().await.current_statuses();
    if board.is_empty() {
        println!("Status board is empty (no policy entries or records)");
        return Ok(());
    }

    println!("{:<10} {:<24} {:<4} Remaining", "Status", "Boss", "Ch");
    println!("{}", "-".repeat(52));
    for line in render_board(&board, only) {
        println!("{line}");
    }
    Ok(())
}

pub async fn list_records(ctx: &AppContext, include_closed: bool) -> Result<(), String> {
    let records = ctx.records.read().await;
    let shown: Vec<_> = records
        .records()
        .iter()
        .filter(|r| include_closed || r.is_pending())
        .collect();

    if shown.is_empty() {
        println!("No records");
        return Ok(());
    }

    println!(
        "{:>5} {:<8} {:<24} {:<4} {:<20} Time",
        "Id", "Status", "Boss", "Ch", "Map"
    );
    println!("{}", "-".repeat(90));
    let count = shown.len();
    for record in shown {
        println!("{}", render_record(record));
    }
    println!("\nShowing {} of {} records", count, records.len());
    Ok(())
}

/// Write to the record book, then persist and reclassify
async fn after_write(ctx: &AppContext) -> Result<(), String> {
    let changes = ctx.publish_records().await?;
    announce(ctx, &changes).await;
    Ok(())
}

/// Fill the map from the policy table when the user did not give one
async fn resolve_map(ctx: &AppContext, name: &str, map: Option<String>) -> Option<String> {
    match map {
        Some(m) => Some(m),
        None => ctx.store.read().await.policy().map_for(name).map(String::from),
    }
}

pub async fn add_pending(
    ctx: &AppContext,
    name: &str,
    channel: Option<String>,
    map: Option<String>,
    at: &str,
) -> Result<(), String> {
    let when = parse_when(Some(at))?;
    let map = resolve_map(ctx, name, map).await;

    let id = ctx
        .records
        .write()
        .await
        .add_pending(name, map, channel, when)
        .map_err(|e| error_chain(&e))?;

    println!("Added pending record {id}");
    after_write(ctx).await
}

pub async fn log_kill(
    ctx: &AppContext,
    name: &str,
    channel: Option<String>,
    map: Option<String>,
    at: Option<&str>,
) -> Result<(), String> {
    let when = parse_when(at)?;
    let map = resolve_map(ctx, name, map).await;

    let id = ctx
        .records
        .write()
        .await
        .record_kill(name, map, channel, when)
        .map_err(|e| error_chain(&e))?;

    println!("Logged kill as record {id}");
    after_write(ctx).await
}

pub async fn mark_killed(ctx: &AppContext, id: u64, at: Option<&str>) -> Result<(), String> {
    let when = parse_when(at)?;
    ctx.records
        .write()
        .await
        .mark_killed(id, when)
        .map_err(|e| error_chain(&e))?;

    println!("Record {id} marked killed");
    after_write(ctx).await
}

pub async fn mark_noshow(ctx: &AppContext, id: u64) -> Result<(), String> {
    ctx.records
        .write()
        .await
        .mark_noshow(id)
        .map_err(|e| error_chain(&e))?;

    println!("Record {id} marked no-show");
    after_write(ctx).await
}

pub async fn delete_record(ctx: &AppContext, id: u64) -> Result<(), String> {
    ctx.records
        .write()
        .await
        .delete(id)
        .map_err(|e| error_chain(&e))?;

    println!("Record {id} deleted");
    after_write(ctx).await
}

pub async fn purge_deleted(ctx: &AppContext) -> Result<(), String> {
    let removed = ctx.records.write().await.purge_deleted();
    println!("Removed {removed} deleted records");
    after_write(ctx).await
}

pub async fn reload_policy(ctx: &AppContext) -> Result<(), String> {
    let (count, changes) = ctx.reload_policy().await?;
    println!("Loaded respawn windows for {count} bosses");
    announce(ctx, &changes).await;
    Ok(())
}

pub async fn show_config(ctx: &AppContext) -> Result<(), String> {
    let config = ctx.config.read().await;
    println!("Policy file:    {}", config.policy_path().display());
    println!("Records file:   {}", config.records_path().display());
    println!("Tracked ch:     {}", config.channels.tracked.join(", "));
    println!("Valid ch:       {}", config.channels.valid.join(", "));
    println!("Kill offset:    {}m", config.timing.kill_offset_minutes);
    println!("Early add:      {}h", config.timing.early_add_hours);
    println!("Stale after:    {}h", config.timing.stale_after_hours);
    println!("Soon lead:      {}m", config.timing.soon_lead_minutes);
    println!("Tick interval:  {}s", config.timing.tick_interval_secs);
    println!(
        "Discord:        {}",
        if config.discord.is_active() { "on" } else { "off" }
    );
    Ok(())
}

pub async fn set_webhook(ctx: &AppContext, url: Option<String>) -> Result<(), String> {
    let discord = {
        let mut config = ctx.config.write().await;
        match url {
            Some(url) => {
                config.discord.webhook_url = url;
                config.discord.enabled = true;
            }
            None => config.discord.enabled = false,
        }
        config
            .clone()
            .save()
            .map_err(|e| error_chain(&e))?;
        config.discord.clone()
    };

    let active = discord.is_active();
    *ctx.notifier.write().await = DiscordNotifier::new(discord);
    println!("Discord notifications {}", if active { "enabled" } else { "disabled" });
    Ok(())
}

pub fn exit() -> Result<(), String> {
    write!(std::io::stdout(), "quitting...").map_err(|e| e.to_string())?;
    std::io::stdout().flush().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parse_when_accepts_now_and_iso() {
        let before = Utc::now();
        assert!(parse_when(None).unwrap() >= before);
        assert!(parse_when(Some("now")).unwrap() >= before);
        assert_eq!(
            parse_when(Some("2025-06-01T10:00:00Z")).unwrap(),
            Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap()
        );
        assert!(parse_when(Some("tomorrow-ish")).is_err());
    }

    #[test]
    fn render_board_filters_by_status() {
        let mut soon = BossStatusInfo::available("Nix", Some("2"));
        soon.status = BossStatus::Soon;
        soon.time_remaining = Some(65);
        let board = vec![BossStatusInfo::available("Nix", Some("1")), soon];

        let all = render_board(&board, None);
        assert_eq!(all.len(), 2);
        assert!(all[0].starts_with("available"));

        let only_soon = render_board(&board, Some(BossStatus::Soon));
        assert_eq!(only_soon.len(), 1);
        assert!(only_soon[0].ends_with("1h 05m"));
    }
}
