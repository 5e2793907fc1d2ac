//! Respawn tracking
//!
//! This module provides:
//! - **RespawnPolicy**: Per-boss respawn windows (loaded from TOML)
//! - **RespawnTimeline**: Thresholds derived from one observed kill
//! - **classify**: Maps the current records onto the status board
//!
//! # Data Flow
//!
//! ```text
//! BossRecord list ──┐
//! RespawnPolicy ────┼──► classify(now) ──► Vec<BossStatusInfo>
//! ClassifierSettings┘
//! ```

mod classifier;
mod error;
mod loader;
mod policy;
mod settings;
mod window;


pub use classifier::{classify, status_at};
pub use error::{PolicyError, SettingsError};
pub use loader::{PolicyEntry, PolicyFile, load_policy_from_dir, load_policy_from_file, parse_policy};
pub use policy::RespawnPolicy;
pub use settings::ClassifierSettings;
pub use window::{MAX_WINDOW_HOURS, RespawnTimeline, hours, minutes_until};
