use std::time::Duration;

use chrono::Utc;
use spawnwatch_core::StatusChange;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::AppContext;

/// Start the periodic reclassification task
pub fn spawn_ticker(ctx: AppContext, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            let changes = ctx.store.write().await.tick(Utc::now());
            announce(&ctx, &changes).await;
        }
    })
}

/// Log board changes and forward them to Discord.
/// Locks are released before any network call.
pub async fn announce(ctx: &AppContext, changes: &[StatusChange]) {
    if changes.is_empty() {
        return;
    }

    for change in changes {
        tracing::info!(
            pair = %change.key,
            from = change.previous.map(|s| s.label()).unwrap_or("-"),
            to = change.current.map(|s| s.label()).unwrap_or("-"),
            "Status changed"
        );
    }

    let notifier = ctx.notifier.read().await.clone();
    notifier.notify_changes(changes).await;
}
