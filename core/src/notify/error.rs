//! Error types for webhook delivery

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("discord webhook is not configured")]
    NotConfigured,

    #[error("webhook request failed")]
    Request(#[from] reqwest::Error),

    #[error("webhook rejected message with status {status}: {body}")]
    Rejected { status: u16, body: String },
}
