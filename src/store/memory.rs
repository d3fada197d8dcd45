//! In-memory timestamp store.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use super::{StoreError, TimestampStore};

/// In-memory timestamp store.
///
/// Clones share the same underlying map. Used for ephemeral deployments and
/// as the fake backend in handler tests. Contents are lost on restart.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    /// Whether the store holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl TimestampStore for MemoryStore {
    async fn put(&self, list_id: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().unwrap();
        entries.insert(list_id.to_string(), value.to_string());
        Ok(())
    }

    async fn get(&self, list_id: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.read().unwrap();
        Ok(entries.get(list_id).cloned())
    }
}
