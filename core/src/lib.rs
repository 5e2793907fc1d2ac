pub mod boss;
pub mod context;
pub mod notify;
pub mod records;
pub mod respawn;
pub mod state;

// Re-exports for convenience
pub use boss::{BossRecord, BossStatus, BossStatusInfo, PairKey, RecordStatus, parse_timestamp};
pub use context::{AppConfig, AppConfigExt, BackgroundTasks};
pub use notify::DiscordNotifier;
pub use records::{RecordBook, RecordError};
pub use respawn::{ClassifierSettings, PolicyError, RespawnPolicy, SettingsError, classify};
pub use state::{StatusChange, StatusStore};
