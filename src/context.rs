use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use spawnwatch_core::context::{AppConfig, AppConfigExt, BackgroundTasks};
use spawnwatch_core::respawn::{PolicyError, RespawnPolicy, load_policy_from_dir, load_policy_from_file};
use spawnwatch_core::{DiscordNotifier, RecordBook, StatusChange, StatusStore};
use tokio::sync::{Mutex, RwLock};

/// Holds all shared state for the application.
/// This is a lightweight container - logic lives in the core types.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<RwLock<AppConfig>>,
    pub records: Arc<RwLock<RecordBook>>,
    pub store: Arc<RwLock<StatusStore>>,
    pub notifier: Arc<RwLock<DiscordNotifier>>,
    pub tasks: Arc<Mutex<BackgroundTasks>>,
}

impl AppContext {
    /// Build the context from config: loads the policy table and record book.
    pub fn new(config: AppConfig) -> Result<Self, String> {
        let policy = load_policy(&config.policy_path()).map_err(|e| error_chain(&e))?;
        let records = RecordBook::load(&config.records_path(), config.channels.clone())
            .map_err(|e| error_chain(&e))?;

        let settings = config.classifier_settings().map_err(|e| error_chain(&e))?;
        let mut store = StatusStore::new(Arc::new(policy), settings);
        store.refresh(records.snapshot(), Utc::now());

        let notifier = DiscordNotifier::new(config.discord.clone());

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            records: Arc::new(RwLock::new(records)),
            store: Arc::new(RwLock::new(store)),
            notifier: Arc::new(RwLock::new(notifier)),
            tasks: Arc::new(Mutex::new(BackgroundTasks::default())),
        })
    }

    /// Persist the record book and push its snapshot into the status store.
    pub async fn publish_records(&self) -> Result<Vec<StatusChange>, String> {
        let path = self.config.read().await.records_path();
        let snapshot = {
            let records = self.records.read().await;
            records.save(&path).map_err(|e| error_chain(&e))?;
            records.snapshot()
        };

        let changes = self.store.write().await.refresh(snapshot, Utc::now());
        Ok(changes)
    }

    /// Reload the policy table from the configured path
    pub async fn reload_policy(&self) -> Result<(usize, Vec<StatusChange>), String> {
        let path = self.config.read().await.policy_path();
        let policy = load_policy(&path).map_err(|e| error_chain(&e))?;
        let count = policy.len();

        let changes = self
            .store
            .write()
            .await
            .replace_policy(Arc::new(policy), Utc::now());
        Ok((count, changes))
    }
}

/// Policy from a file or a directory of files. A missing path is an empty table.
pub fn load_policy(path: &Path) -> Result<RespawnPolicy, PolicyError> {
    if path.is_dir() {
        load_policy_from_dir(path)
    } else if path.exists() {
        load_policy_from_file(path)
    } else {
        tracing::warn!(path = %path.display(), "Respawn policy not found, board will be empty");
        Ok(RespawnPolicy::new())
    }
}

/// Render an error with its source chain on one line
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}
