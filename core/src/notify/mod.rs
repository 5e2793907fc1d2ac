//! Discord webhook notifications for status board changes

mod discord;
mod error;

pub use discord::{DISCORD_MESSAGE_LIMIT, DiscordNotifier, WebhookPayload, batch_lines, format_change, format_remaining};
pub use error::NotifyError;
