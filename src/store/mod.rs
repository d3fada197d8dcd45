//! Storage backends for shared list activity timestamps.
//!
//! The store maps a shared list id to its last activity timestamp,
//! serialized as a string. Writes are last-write-wins per key; there is no
//! versioning, TTL, or deletion path.

pub mod memory;
pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{Config, Storage};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Errors raised by a timestamp store backend
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Blocking task failure
    #[error("Store task failed: {0}")]
    Task(String),
}

/// Key-value access to shared list activity timestamps.
///
/// Values are opaque timestamp strings; interpretation is left to the
/// caller.
#[async_trait]
pub trait TimestampStore: Send + Sync {
    /// Store `value` under `list_id`, replacing any previous value.
    async fn put(&self, list_id: &str, value: &str) -> Result<(), StoreError>;

    /// Fetch the value stored under `list_id`, if any.
    async fn get(&self, list_id: &str) -> Result<Option<String>, StoreError>;
}

/// Build the store backend selected by the configuration
pub fn from_config(config: &Config) -> Result<Arc<dyn TimestampStore>, StoreError> {
    match config.storage {
        Storage::Sqlite => {
            let db_path = config.data_dir().join("listpulse.db");
            Ok(Arc::new(SqliteStore::open(db_path)?))
        }
        Storage::Memory => Ok(Arc::new(MemoryStore::new())),
    }
}
