//! Local history of generated videos.
//!
//! This crate provides:
//! - A key-value store interface with file and in-memory backends
//! - `VideoHistory`, the newest-first list of generated videos

pub mod error;
pub mod history;
pub mod store;

pub use error::{HistoryError, HistoryResult};
pub use history::{HistoryConfig, VideoHistory, HISTORY_KEY};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};
