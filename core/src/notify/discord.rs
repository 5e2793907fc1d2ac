use std::time::Duration;

use serde::Serialize;
use spawnwatch_types::DiscordConfig;

use crate::boss::BossStatus;
use crate::state::StatusChange;

use super::NotifyError;

/// Discord rejects message content longer than this
pub const DISCORD_MESSAGE_LIMIT: usize = 2000;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// JSON body of a webhook execution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebhookPayload {
    pub username: String,
    pub content: String,
}

/// Render minutes as `1h 05m` or `45m`
pub fn format_remaining(minutes: i64) -> String {
    let minutes = minutes.max(0);
    let (h, m) = (minutes / 60, minutes % 60);
    if h > 0 {
        format!("{h}h {m:02}m")
    } else {
        format!("{m}m")
    }
}

/// One message line for a change, or None for changes nobody gets pinged about
pub fn format_change(change: &StatusChange) -> Option<String> {
    let channel = change
        .key
        .channel
        .as_deref()
        .map(|ch| format!(" ch {ch}"))
        .unwrap_or_default();

    if change.entered(BossStatus::Available) {
        Some(format!(
            ":green_circle: **{}**{} can spawn now",
            change.key.name, channel
        ))
    } else if change.entered(BossStatus::Soon) {
        let eta = change
            .time_remaining
            .map(|m| format!(" (in {})", format_remaining(m)))
            .unwrap_or_default();
        Some(format!(
            ":yellow_circle: **{}**{} is coming up{}",
            change.key.name, channel, eta
        ))
    } else {
        None
    }
}

/// Pack lines into as few messages as fit under `limit` characters each.
/// A single over-long line is truncated.
pub fn batch_lines(lines: &[String], limit: usize) -> Vec<String> {
    let mut batches = Vec::new();
    let mut current = String::new();

    for line in lines {
        let line: String = line.chars().take(limit).collect();
        let needed = if current.is_empty() {
            line.chars().count()
        } else {
            current.chars().count() + 1 + line.chars().count()
        };

        if needed > limit && !current.is_empty() {
            batches.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(&line);
    }

    if !current.is_empty() {
        batches.push(current);
    }
    batches
}

/// Posts board changes to a Discord webhook
#[derive(Debug, Clone)]
pub struct DiscordNotifier {
    client: reqwest::Client,
    config: DiscordConfig,
}

impl DiscordNotifier {
    pub fn new(config: DiscordConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &DiscordConfig {
        &self.config
    }

    /// Message lines for the changes this webhook is configured to announce
    pub fn lines_for(&self, changes: &[StatusChange]) -> Vec<String> {
        changes
            .iter()
            .filter(|c| {
                (self.config.notify_available && c.entered(BossStatus::Available))
                    || (self.config.notify_soon && c.entered(BossStatus::Soon))
            })
            .filter_map(format_change)
            .collect()
    }

    /// Post one message
    pub async fn send(&self, content: &str) -> Result<(), NotifyError> {
        if !self.config.is_active() {
            return Err(NotifyError::NotConfigured);
        }

        let payload = WebhookPayload {
            username: self.config.username.clone(),
            content: content.to_string(),
        };

        let response = self
            .client
            .post(&self.config.webhook_url)
            .json(&payload)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    /// Announce changes. Failures are logged, not returned; returns the
    /// number of messages delivered.
    pub async fn notify_changes(&self, changes: &[StatusChange]) -> usize {
        if !self.config.is_active() {
            return 0;
        }

        let lines = self.lines_for(changes);
        let mut delivered = 0;
        for message in batch_lines(&lines, DISCORD_MESSAGE_LIMIT) {
            match self.send(&message).await {
                Ok(()) => delivered += 1,
                Err(e) => tracing::warn!(error = %e, "Failed to post Discord notification"),
            }
        }

        if delivered > 0 {
            tracing::info!(messages = delivered, lines = lines.len(), "Posted Discord notifications");
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boss::PairKey;

    fn change(previous: Option<BossStatus>, current: BossStatus, remaining: Option<i64>) -> StatusChange {
        StatusChange {
            key: PairKey::new("Nix", Some("3")),
            previous,
            current: Some(current),
            time_remaining: remaining,
        }
    }

    #[test]
    fn remaining_formats() {
        assert_eq!(format_remaining(45), "45m");
        assert_eq!(format_remaining(65), "1h 05m");
        assert_eq!(format_remaining(-3), "0m");
    }

    #[test]
    fn formats_soon_and_available() {
        let soon = change(Some(BossStatus::Waiting), BossStatus::Soon, Some(65));
        assert_eq!(
            format_change(&soon).unwrap(),
            ":yellow_circle: **Nix** ch 3 is coming up (in 1h 05m)"
        );

        let up = change(Some(BossStatus::Soon), BossStatus::Available, None);
        assert_eq!(format_change(&up).unwrap(), ":green_circle: **Nix** ch 3 can spawn now");

        let waiting = change(Some(BossStatus::Available), BossStatus::Waiting, Some(900));
        assert!(format_change(&waiting).is_none());
    }

    #[test]
    fn lines_respect_config_toggles() {
        let notifier = DiscordNotifier::new(DiscordConfig {
            notify_soon: false,
            ..DiscordConfig::default()
        });
        let changes = vec![
            change(Some(BossStatus::Waiting), BossStatus::Soon, Some(30)),
            change(Some(BossStatus::Soon), BossStatus::Available, None),
        ];

        let lines = notifier.lines_for(&changes);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("can spawn now"));
    }

    #[test]
    fn batches_stay_under_limit() {
        let lines: Vec<String> = (0..10).map(|i| format!("line {i:02} {}", "x".repeat(20))).collect();
        let batches = batch_lines(&lines, 64);

        assert!(batches.iter().all(|b| b.chars().count() <= 64));
        assert_eq!(batches.join("\n").lines().count(), 10);
    }

    #[test]
    fn overlong_line_is_truncated() {
        let batches = batch_lines(&["y".repeat(50)], 10);
        assert_eq!(batches, vec!["y".repeat(10)]);
    }

    #[tokio::test]
    async fn inactive_notifier_sends_nothing() {
        let notifier = DiscordNotifier::new(DiscordConfig::default());
        let changes = vec![change(Some(BossStatus::Soon), BossStatus::Available, None)];

        assert_eq!(notifier.notify_changes(&changes).await, 0);
        assert!(matches!(notifier.send("hi").await, Err(NotifyError::NotConfigured)));
    }
}
