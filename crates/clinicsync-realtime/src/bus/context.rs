//! One context's handle on the bus.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use clinicsync_core::result::AppResult;
use clinicsync_core::types::ContextId;

use super::event::{BusEvent, StorageChange};
use super::registry::{ChangeHandler, ContextListeners, ListenerId};
use super::shared::PersistentKeyValueBus;

/// A single page's view of the bus. Detaches when dropped.
#[derive(Debug)]
pub struct BusContext {
    id: ContextId,
    bus: Arc<PersistentKeyValueBus>,
}

impl BusContext {
    pub(crate) fn new(id: ContextId, bus: Arc<PersistentKeyValueBus>) -> Self {
        Self { id, bus }
    }

    /// This context's identifier.
    pub fn id(&self) -> ContextId {
        self.id
    }

    /// The bus this context is attached to.
    pub fn bus(&self) -> &Arc<PersistentKeyValueBus> {
        &self.bus
    }

    /// Read the current value of a key.
    pub async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.bus.read(key).await
    }

    /// Write a key. Listeners in other contexts run before this returns;
    /// listeners in this context do not run.
    ///
    /// Returns the number of listeners invoked.
    pub async fn set(&self, key: &str, value: &str) -> AppResult<usize> {
        self.bus.write(self.id, key, Some(value), None).await
    }

    /// Remove a key, delivering the removal like a write.
    pub async fn remove(&self, key: &str) -> AppResult<usize> {
        self.bus.write(self.id, key, None, None).await
    }

    /// Observe writes to `key` made by other contexts.
    pub fn on_change<F>(&self, key: &str, handler: F) -> ListenerId
    where
        F: Fn(&StorageChange) + Send + Sync + 'static,
    {
        self.listen(key, None, Arc::new(handler))
    }

    fn listen(&self, key: &str, topic: Option<&str>, handler: ChangeHandler) -> ListenerId {
        let listeners = self.bus.listeners(self.id).unwrap_or_else(|| {
            // Detached: the handler is registered nowhere and never fires.
            warn!(context = %self.id, key, "Listener added to a detached context");
            Arc::new(ContextListeners::new())
        });
        match topic {
            Some(topic) => listeners.add_for_topic(key, topic, handler),
            None => listeners.add(key, handler),
        }
    }

    /// Remove a listener added with [`on_change`](Self::on_change) or
    /// [`subscribe`](Self::subscribe).
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.bus
            .listeners(self.id)
            .map(|listeners| listeners.remove(id))
            .unwrap_or(false)
    }

    /// Publish `{type: topic, timestamp: now, data}` under the bus key.
    ///
    /// Returns the number of `topic` subscribers reached in other contexts.
    /// Raw listeners on the bus key still see the write but are not counted.
    pub async fn publish<T: Serialize + ?Sized>(&self, topic: &str, data: &T) -> AppResult<usize> {
        let event = BusEvent::new(topic, serde_json::to_value(data)?);
        let raw = serde_json::to_string(&event)?;
        let delivered = self
            .bus
            .write(self.id, &self.bus.config().key, Some(&raw), Some(topic))
            .await?;
        debug!(context = %self.id, topic, delivered, "Published bus event");
        Ok(delivered)
    }

    /// Call `handler` for every event on `topic` published by another context.
    ///
    /// Values under the bus key that are not events, or belong to a
    /// different topic, are ignored.
    pub fn subscribe<F>(&self, topic: &str, handler: F) -> ListenerId
    where
        F: Fn(&BusEvent) + Send + Sync + 'static,
    {
        let wanted = topic.to_string();
        let key = self.bus.config().key.clone();
        self.listen(
            &key,
            Some(topic),
            Arc::new(move |change: &StorageChange| {
                let Some(raw) = change.new_value.as_deref() else {
                    return;
                };
                match BusEvent::parse(raw) {
                    Some(event) if event.topic == wanted => handler(&event),
                    Some(_) => {}
                    None => warn!(key = %change.key, "Ignoring malformed bus event"),
                }
            }),
        )
    }

    /// The event currently held under the bus key, if it is on `topic`.
    ///
    /// This is all a late subscriber can learn about earlier publishes.
    pub async fn latest(&self, topic: &str) -> AppResult<Option<BusEvent>> {
        let raw = self.get(&self.bus.config().key).await?;
        Ok(raw
            .as_deref()
            .and_then(BusEvent::parse)
            .filter(|event| event.topic == topic))
    }
}

impl Drop for BusContext {
    fn drop(&mut self) {
        self.bus.detach(self.id);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use clinicsync_core::config::BusConfig;
    use clinicsync_storage::memory::MemoryKeyValueStore;

    fn bus() -> Arc<PersistentKeyValueBus> {
        PersistentKeyValueBus::new(Arc::new(MemoryKeyValueStore::new()), BusConfig::default())
    }

    #[tokio::test]
    async fn test_publish_reaches_each_other_context_once() {
        let bus = bus();
        let publisher = bus.attach();
        let others: Vec<BusContext> = (0..3).map(|_| bus.attach()).collect();

        let publisher_hits = Arc::new(AtomicUsize::new(0));
        let hits = Arc::clone(&publisher_hits);
        publisher.subscribe("catalog_update", move |_| {
            hits.fetch_add(1, Ordering::SeqCst);
        });

        let counters: Vec<Arc<AtomicUsize>> = others
            .iter()
            .map(|ctx| {
                let counter = Arc::new(AtomicUsize::new(0));
                let c = Arc::clone(&counter);
                ctx.subscribe("catalog_update", move |_| {
                    c.fetch_add(1, Ordering::SeqCst);
                });
                counter
            })
            .collect();

        let delivered = publisher
            .publish("catalog_update", &serde_json::json!([]))
            .await
            .unwrap();

        assert_eq!(delivered, 3);
        assert_eq!(publisher_hits.load(Ordering::SeqCst), 0);
        for counter in &counters {
            assert_eq!(counter.load(Ordering::SeqCst), 1);
        }
    }

    #[tokio::test]
    async fn test_topic_filter() {
        let bus = bus();
        let a = bus.attach();
        let b = bus.attach();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        b.subscribe("catalog_update", move |_| {
            h.fetch_add(1, Ordering::SeqCst);
        });

        a.publish("something_else", &1).await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        a.publish("catalog_update", &1).await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_publish_counts_only_topic_subscribers() {
        let bus = bus();
        let a = bus.attach();
        let b = bus.attach();
        b.subscribe("catalog_update", |_| {});
        b.subscribe("something_else", |_| {});
        let raw_hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&raw_hits);
        b.on_change(&bus.config().key, move |_| {
            h.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(a.publish("catalog_update", &1).await.unwrap(), 1);
        assert_eq!(raw_hits.load(Ordering::SeqCst), 1);
        assert_eq!(a.set(&bus.config().key, "{}").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_listeners_fire_in_attachment_order() {
        let bus = bus();
        let a = bus.attach();
        let b = bus.attach();
        let order = Arc::new(Mutex::new(Vec::new()));
        for n in 0..3 {
            let order = Arc::clone(&order);
            b.subscribe("catalog_update", move |_| order.lock().unwrap().push(n));
        }
        a.publish("catalog_update", &()).await.unwrap();
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_late_subscriber_sees_only_latest() {
        let bus = bus();
        let a = bus.attach();
        a.publish("catalog_update", &1).await.unwrap();
        a.publish("catalog_update", &2).await.unwrap();
        a.publish("catalog_update", &3).await.unwrap();

        let late = bus.attach();
        let latest = late.latest("catalog_update").await.unwrap().unwrap();
        assert_eq!(latest.data, serde_json::json!(3));
        assert!(late.latest("other").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unsubscribe() {
        let bus = bus();
        let a = bus.attach();
        let b = bus.attach();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        let id = b.subscribe("catalog_update", move |_| {
            h.fetch_add(1, Ordering::SeqCst);
        });
        assert!(b.unsubscribe(id));
        a.publish("catalog_update", &()).await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_malformed_value_ignored() {
        let bus = bus();
        let a = bus.attach();
        let b = bus.attach();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        b.subscribe("catalog_update", move |_| {
            h.fetch_add(1, Ordering::SeqCst);
        });
        a.set("admin_clinic_update", "garbage").await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}
