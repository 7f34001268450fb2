//! The session-wide register every context attaches to.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use clinicsync_core::config::BusConfig;
use clinicsync_core::result::AppResult;
use clinicsync_core::traits::kv_store::KeyValueStore;
use clinicsync_core::types::ContextId;

use super::context::BusContext;
use super::event::StorageChange;
use super::registry::ContextListeners;

/// Shared key/value register with change delivery to other contexts.
///
/// A successful write is delivered, before the write call returns, to every
/// listener on that key in every attached context except the writer. The
/// register itself keeps only the latest value per key, so a context that
/// was not listening sees only what was written last.
pub struct PersistentKeyValueBus {
    /// Backing register.
    store: Arc<dyn KeyValueStore>,
    /// Attached contexts and their listeners.
    contexts: DashMap<ContextId, Arc<ContextListeners>>,
    /// Last value this process wrote or observed per key. Held across the
    /// register access in both `write` and `poll_external`.
    last_seen: Mutex<HashMap<String, Option<String>>>,
    /// Bus settings.
    config: BusConfig,
}

impl std::fmt::Debug for PersistentKeyValueBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistentKeyValueBus")
            .field("store", &self.store.provider_type())
            .field("contexts", &self.contexts.len())
            .field("event_key", &self.config.key)
            .finish()
    }
}

impl PersistentKeyValueBus {
    /// Creates a bus over the given register.
    pub fn new(store: Arc<dyn KeyValueStore>, config: BusConfig) -> Arc<Self> {
        Arc::new(Self {
            store,
            contexts: DashMap::new(),
            last_seen: Mutex::new(HashMap::new()),
            config,
        })
    }

    /// Attaches a new context (one open page).
    pub fn attach(self: &Arc<Self>) -> BusContext {
        let id = ContextId::new();
        self.contexts.insert(id, Arc::new(ContextListeners::new()));
        debug!(context = %id, "Context attached to bus");
        BusContext::new(id, Arc::clone(self))
    }

    /// Number of attached contexts.
    pub fn context_count(&self) -> usize {
        self.contexts.len()
    }

    /// Bus settings.
    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    pub(crate) fn detach(&self, id: ContextId) {
        self.contexts.remove(&id);
        debug!(context = %id, "Context detached from bus");
    }

    pub(crate) fn listeners(&self, id: ContextId) -> Option<Arc<ContextListeners>> {
        self.contexts.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    pub(crate) async fn read(&self, key: &str) -> AppResult<Option<String>> {
        self.store.get(key).await
    }

    /// Write (or remove, with `None`) a key and deliver the change.
    ///
    /// Returns the number of listeners invoked, or with `topic` set, the
    /// number of those subscribed to that topic.
    pub(crate) async fn write(
        &self,
        origin: ContextId,
        key: &str,
        value: Option<&str>,
        topic: Option<&str>,
    ) -> AppResult<usize> {
        let new_value = value.map(str::to_string);
        let mut last_seen = self.last_seen.lock().await;
        match value {
            Some(v) => self.store.set(key, v).await?,
            None => self.store.remove(key).await?,
        }
        last_seen.insert(key.to_string(), new_value.clone());

        // Delivered under the lock so a poll round cannot interleave.
        Ok(self.deliver(
            &StorageChange {
                key: key.to_string(),
                new_value,
                origin: Some(origin),
            },
            topic,
        ))
    }

    /// Invoke every listener on `change.key` outside the originating context.
    ///
    /// Returns how many were invoked, counting only subscribers of `topic`
    /// when one is given.
    fn deliver(&self, change: &StorageChange, topic: Option<&str>) -> usize {
        let handlers: Vec<_> = self
            .contexts
            .iter()
            .filter(|entry| Some(*entry.key()) != change.origin)
            .flat_map(|entry| entry.value().handlers_for(&change.key))
            .collect();

        let mut reached = 0;
        for (listener_topic, handler) in &handlers {
            handler(change);
            if topic.is_none() || listener_topic.as_deref() == topic {
                reached += 1;
            }
        }

        debug!(
            key = %change.key,
            listeners = handlers.len(),
            reached,
            "Delivered storage change"
        );
        reached
    }

    /// One polling round over `keys`, delivering values written by someone
    /// other than this process to every context.
    ///
    /// The first round only records the current values.
    pub async fn poll_external(&self, keys: &[String]) -> usize {
        let mut delivered = 0;
        for key in keys {
            let mut last_seen = self.last_seen.lock().await;
            let current = match self.store.get(key).await {
                Ok(v) => v,
                Err(e) => {
                    warn!(key = %key, error = %e, "External poll read failed");
                    continue;
                }
            };
            let changed = match last_seen.insert(key.clone(), current.clone()) {
                Some(prev) if prev != current => Some(current),
                _ => None,
            };

            if let Some(new_value) = changed {
                delivered += self.deliver(
                    &StorageChange {
                        key: key.clone(),
                        new_value,
                        origin: None,
                    },
                    None,
                );
            }
            drop(last_seen);
        }
        delivered
    }
}
