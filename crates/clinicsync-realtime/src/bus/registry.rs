//! Per-context listener registry.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use super::event::StorageChange;

/// Callback invoked with each foreign write to an observed key.
pub type ChangeHandler = Arc<dyn Fn(&StorageChange) + Send + Sync>;

/// Handle for removing a listener from its context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Listener {
    id: ListenerId,
    key: String,
    /// Set for listeners registered through a topic subscription.
    topic: Option<String>,
    handler: ChangeHandler,
}

/// Listeners of one context, kept in attachment order.
#[derive(Default)]
pub struct ContextListeners {
    listeners: Mutex<Vec<Listener>>,
    next_id: AtomicU64,
}

impl std::fmt::Debug for ContextListeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextListeners")
            .field("count", &self.len())
            .finish()
    }
}

impl ContextListeners {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a listener for `key`.
    pub fn add(&self, key: &str, handler: ChangeHandler) -> ListenerId {
        self.push(key, None, handler)
    }

    /// Appends a listener for `key` that only acts on events of `topic`.
    pub fn add_for_topic(&self, key: &str, topic: &str, handler: ChangeHandler) -> ListenerId {
        self.push(key, Some(topic.to_string()), handler)
    }

    fn push(&self, key: &str, topic: Option<String>, handler: ChangeHandler) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Listener {
                id,
                key: key.to_string(),
                topic,
                handler,
            });
        id
    }

    /// Removes a listener. Returns whether it was registered.
    pub fn remove(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock().unwrap_or_else(|e| e.into_inner());
        let before = listeners.len();
        listeners.retain(|l| l.id != id);
        listeners.len() != before
    }

    /// Handlers observing `key` with their topic, in attachment order.
    pub fn handlers_for(&self, key: &str) -> Vec<(Option<String>, ChangeHandler)> {
        self.listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|l| l.key == key)
            .map(|l| (l.topic.clone(), Arc::clone(&l.handler)))
            .collect()
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    /// Whether no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> ChangeHandler {
        Arc::new(|_: &StorageChange| {})
    }

    #[test]
    fn test_handlers_filtered_by_key() {
        let registry = ContextListeners::new();
        registry.add("a", noop());
        registry.add("b", noop());
        registry.add("a", noop());
        assert_eq!(registry.handlers_for("a").len(), 2);
        assert_eq!(registry.handlers_for("c").len(), 0);
    }

    #[test]
    fn test_topic_is_kept() {
        let registry = ContextListeners::new();
        registry.add("a", noop());
        registry.add_for_topic("a", "catalog_update", noop());
        let topics: Vec<_> = registry
            .handlers_for("a")
            .into_iter()
            .map(|(topic, _)| topic)
            .collect();
        assert_eq!(topics, vec![None, Some("catalog_update".to_string())]);
    }

    #[test]
    fn test_remove() {
        let registry = ContextListeners::new();
        let id = registry.add("a", noop());
        assert!(registry.remove(id));
        assert!(!registry.remove(id));
        assert!(registry.is_empty());
    }
}
