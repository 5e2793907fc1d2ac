use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use spawnwatch_types::ChannelConfig;

use crate::boss::{BossRecord, PairKey, RecordStatus, format_timestamp};

use super::RecordError;

/// Authoritative collection of boss records.
///
/// `pending` indexes the single pending record per pair and is updated on
/// every write, so duplicate checks never need to scan the list.
#[derive(Debug, Clone)]
pub struct RecordBook {
    records: Vec<BossRecord>,
    next_id: u64,
    pending: HashMap<PairKey, u64>,
    channels: ChannelConfig,
}

impl RecordBook {
    pub fn new(channels: ChannelConfig) -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
            pending: HashMap::new(),
            channels,
        }
    }

    /// Build a book from existing records.
    ///
    /// Records without an id get one. If several pending records share a pair
    /// the first one wins the index and the rest are logged.
    pub fn from_records(records: Vec<BossRecord>, channels: ChannelConfig) -> Self {
        let mut book = Self::new(channels);
        book.next_id = records.iter().map(|r| r.id).max().unwrap_or(0) + 1;

        for mut record in records {
            if record.id == 0 {
                record.id = book.allocate_id();
            }
            if record.is_pending() {
                let key = record.key();
                if let Some(existing) = book.pending.get(&key) {
                    tracing::warn!(
                        pair = %key,
                        kept = existing,
                        duplicate = record.id,
                        "Duplicate pending record in loaded data"
                    );
                } else {
                    book.pending.insert(key, record.id);
                }
            }
            book.records.push(record);
        }
        book
    }

    // --- Persistence ---

    /// Load records from a JSON file. A missing file yields an empty book.
    pub fn load(path: &Path, channels: ChannelConfig) -> Result<Self, RecordError> {
        if !path.exists() {
            return Ok(Self::new(channels));
        }

        let content = std::fs::read_to_string(path).map_err(|source| RecordError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;

        let records: Vec<BossRecord> =
            serde_json::from_str(&content).map_err(|source| RecordError::ParseJson {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::info!(path = %path.display(), records = records.len(), "Loaded boss records");
        Ok(Self::from_records(records, channels))
    }

    /// Save records to a JSON file, creating parent directories if needed
    pub fn save(&self, path: &Path) -> Result<(), RecordError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| RecordError::WriteFile {
                path: path.to_path_buf(),
                source,
            })?;
        }

        let content = serde_json::to_string_pretty(&self.records).map_err(RecordError::Serialize)?;
        std::fs::write(path, content).map_err(|source| RecordError::WriteFile {
            path: path.to_path_buf(),
            source,
        })
    }

    // --- Queries ---

    pub fn records(&self) -> &[BossRecord] {
        &self.records
    }

    /// Owned copy for handing to the status store
    pub fn snapshot(&self) -> Vec<BossRecord> {
        self.records.clone()
    }

    pub fn get(&self, id: u64) -> Option<&BossRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// The pending record for a pair, if one exists
    pub fn pending_for(&self, key: &PairKey) -> Option<&BossRecord> {
        self.pending.get(key).and_then(|id| self.get(*id))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    // --- Writes ---

    /// Start tracking an expected spawn
    pub fn add_pending(
        &mut self,
        name: &str,
        map: Option<String>,
        channel: Option<String>,
        spawn_time: DateTime<Utc>,
    ) -> Result<u64, RecordError> {
        self.validate_target(name, channel.as_deref())?;

        let key = PairKey::new(name.trim(), channel.as_deref());
        if let Some(existing_id) = self.pending.get(&key) {
            return Err(RecordError::DuplicatePending {
                pair: key.to_string(),
                existing_id: *existing_id,
            });
        }

        let id = self.push(name, map, channel, RecordStatus::Pending, spawn_time);
        self.pending.insert(key, id);
        Ok(id)
    }

    /// Record a kill directly, without a pending record first
    pub fn record_kill(
        &mut self,
        name: &str,
        map: Option<String>,
        channel: Option<String>,
        killed_at: DateTime<Utc>,
    ) -> Result<u64, RecordError> {
        self.validate_target(name, channel.as_deref())?;
        Ok(self.push(name, map, channel, RecordStatus::Killed, killed_at))
    }

    /// Confirm a kill. Also corrects the time on an existing kill.
    pub fn mark_killed(&mut self, id: u64, killed_at: DateTime<Utc>) -> Result<(), RecordError> {
        let record = self.get_mut(id)?;
        match record.status {
            RecordStatus::Pending | RecordStatus::Killed => {}
            from => {
                return Err(RecordError::InvalidTransition {
                    id,
                    from,
                    action: "killed",
                });
            }
        }
        record.status = RecordStatus::Killed;
        record.spawn_time = format_timestamp(killed_at);
        let key = record.key();

        self.release_pending(&key, id);
        tracing::info!(id, pair = %key, "Marked record killed");
        Ok(())
    }

    /// The boss did not appear
    pub fn mark_noshow(&mut self, id: u64) -> Result<(), RecordError> {
        let record = self.get_mut(id)?;
        if record.status != RecordStatus::Pending {
            return Err(RecordError::InvalidTransition {
                id,
                from: record.status,
                action: "noshow",
            });
        }
        record.status = RecordStatus::Noshow;
        let key = record.key();

        self.release_pending(&key, id);
        tracing::info!(id, pair = %key, "Marked record no-show");
        Ok(())
    }

    /// Soft delete; the record stays in the file tagged `deleted`
    pub fn delete(&mut self, id: u64) -> Result<(), RecordError> {
        let record = self.get_mut(id)?;
        if record.status == RecordStatus::Deleted {
            return Err(RecordError::InvalidTransition {
                id,
                from: record.status,
                action: "deleted",
            });
        }
        record.status = RecordStatus::Deleted;
        let key = record.key();

        self.release_pending(&key, id);
        tracing::info!(id, pair = %key, "Deleted record");
        Ok(())
    }

    /// Drop soft-deleted records for good. Returns how many were removed.
    pub fn purge_deleted(&mut self) -> usize {
        let before = self.records.len();
        self.records.retain(|r| r.status != RecordStatus::Deleted);
        before - self.records.len()
    }

    // --- Internals ---

    fn validate_target(&self, name: &str, channel: Option<&str>) -> Result<(), RecordError> {
        if name.trim().is_empty() {
            return Err(RecordError::EmptyName);
        }
        if let Some(ch) = channel
            && !self.channels.is_valid(ch)
        {
            return Err(RecordError::InvalidChannel {
                channel: ch.to_string(),
            });
        }
        Ok(())
    }

    fn push(
        &mut self,
        name: &str,
        map: Option<String>,
        channel: Option<String>,
        status: RecordStatus,
        spawn_time: DateTime<Utc>,
    ) -> u64 {
        let id = self.allocate_id();
        let mut record = BossRecord::new(name.trim(), channel, status, spawn_time);
        record.id = id;
        record.map = map;

        tracing::info!(id, pair = %record.key(), status = status.label(), "Added record");
        self.records.push(record);
        id
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn get_mut(&mut self, id: u64) -> Result<&mut BossRecord, RecordError> {
        self.records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(RecordError::UnknownRecord { id })
    }

    /// Drop `id` from the pending index. A duplicate pending record for the
    /// same pair (possible in loaded data) takes over the slot.
    fn release_pending(&mut self, key: &PairKey, id: u64) {
        if self.pending.get(key) != Some(&id) {
            return;
        }
        self.pending.remove(key);

        if let Some(next) = self
            .records
            .iter()
            .find(|r| r.id != id && r.is_pending() && r.key() == *key)
        {
            tracing::debug!(pair = %key, id = next.id, "Pending index moved to duplicate record");
            self.pending.insert(key.clone(), next.id);
        }
    }
}
