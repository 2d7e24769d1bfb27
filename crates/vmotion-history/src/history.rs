//! Newest-first list of generated videos.

use std::path::PathBuf;

use tracing::{info, warn};

use vmotion_models::{GeneratedVideoRecord, VideoId};

use crate::error::HistoryResult;
use crate::store::{JsonFileStore, KeyValueStore};

/// Storage key holding the serialized history list.
pub const HISTORY_KEY: &str = "vividmotion_history";

/// History configuration.
#[derive(Debug, Clone)]
pub struct HistoryConfig {
    /// File backing the key-value store
    pub store_path: PathBuf,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(".vividmotion/history.json"),
        }
    }
}

impl HistoryConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let store_path = std::env::var("VMOTION_HISTORY_PATH")
            .map(PathBuf::from)
            .or_else(|_| {
                std::env::var("VMOTION_DATA_DIR").map(|dir| PathBuf::from(dir).join("history.json"))
            })
            .unwrap_or_else(|_| Self::default().store_path);

        Self { store_path }
    }

    /// Open the file-backed store this config points at.
    pub fn open_store(&self) -> JsonFileStore {
        JsonFileStore::new(&self.store_path)
    }
}

/// In-memory view of the history, written through to a key-value store.
pub struct VideoHistory<S> {
    store: S,
    records: Vec<GeneratedVideoRecord>,
}

impl<S: KeyValueStore> VideoHistory<S> {
    /// Load the history from the store.
    ///
    /// Unreadable data is logged and treated as an empty history; store
    /// access errors are returned.
    pub async fn load(store: S) -> HistoryResult<Self> {
        let records = match store.get(HISTORY_KEY).await? {
            Some(raw) => match serde_json::from_str::<Vec<GeneratedVideoRecord>>(&raw) {
                Ok(records) => records,
                Err(e) => {
                    warn!(error = %e, "Failed to load history, starting empty");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        Ok(Self { store, records })
    }

    /// Records, newest first.
    pub fn list(&self) -> &[GeneratedVideoRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &VideoId) -> Option<&GeneratedVideoRecord> {
        self.records.iter().find(|r| &r.id == id)
    }

    /// Prepend a record and persist.
    pub async fn add(&mut self, record: GeneratedVideoRecord) -> HistoryResult<()> {
        info!(video_id = %record.id, "Adding video to history");
        self.records.insert(0, record);
        self.persist().await
    }

    /// Remove a record by id and persist.
    ///
    /// Returns the removed record, if there was one.
    pub async fn delete(&mut self, id: &VideoId) -> HistoryResult<Option<GeneratedVideoRecord>> {
        let Some(pos) = self.records.iter().position(|r| &r.id == id) else {
            return Ok(None);
        };

        let removed = self.records.remove(pos);
        self.persist().await?;
        info!(video_id = %id, "Deleted video from history");
        Ok(Some(removed))
    }

    async fn persist(&self) -> HistoryResult<()> {
        let raw = serde_json::to_string(&self.records)?;
        self.store.set(HISTORY_KEY, raw).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use vmotion_models::GenerationConfig;

    fn record(prompt: &str) -> GeneratedVideoRecord {
        GeneratedVideoRecord::from_generation(&GenerationConfig::new(prompt), "file:///v.mp4")
    }

    #[tokio::test]
    async fn test_empty_store_loads_empty_history() {
        let history = VideoHistory::load(MemoryStore::new()).await.unwrap();
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn test_add_prepends_newest_first() {
        let mut history = VideoHistory::load(MemoryStore::new()).await.unwrap();
        history.add(record("first")).await.unwrap();
        history.add(record("second")).await.unwrap();

        let prompts: Vec<_> = history.list().iter().map(|r| r.prompt.as_str()).collect();
        assert_eq!(prompts, vec!["second", "first"]);
    }

    #[tokio::test]
    async fn test_delete_removes_only_matching_record() {
        let mut history = VideoHistory::load(MemoryStore::new()).await.unwrap();
        let keep = record("keep");
        let drop = record("drop");
        let drop_id = drop.id.clone();
        history.add(keep.clone()).await.unwrap();
        history.add(drop).await.unwrap();

        let removed = history.delete(&drop_id).await.unwrap();
        assert_eq!(removed.map(|r| r.prompt), Some("drop".to_string()));
        assert_eq!(history.list(), &[keep]);

        assert!(history.delete(&drop_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_history_loads_empty() {
        let store = MemoryStore::new();
        store.set(HISTORY_KEY, "[{broken".to_string()).await.unwrap();

        let history = VideoHistory::load(store).await.unwrap();
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn test_history_survives_reload_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = HistoryConfig {
            store_path: dir.path().join("history.json"),
        };

        let rec = record("persisted");
        let mut history = VideoHistory::load(config.open_store()).await.unwrap();
        history.add(rec.clone()).await.unwrap();

        let reloaded = VideoHistory::load(config.open_store()).await.unwrap();
        assert_eq!(reloaded.list(), &[rec.clone()]);
        assert_eq!(reloaded.get(&rec.id), Some(&rec));
    }
}
