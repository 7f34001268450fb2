//! In-memory key/value store using dashmap.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use clinicsync_core::result::AppResult;
use clinicsync_core::traits::kv_store::KeyValueStore;

use crate::keys;

/// Process-local key/value store.
///
/// Clones share the same map, which is how several contexts in one
/// process see one session register.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    entries: Arc<DashMap<String, String>>,
}

impl MemoryKeyValueStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no key is held.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        keys::validate(key)?;
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        keys::validate(key)?;
        self.entries.insert(key.to_string(), value.to_string());
        debug!(key, bytes = value.len(), "Stored value");
        Ok(())
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        keys::validate(key)?;
        self.entries.remove(key);
        Ok(())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
