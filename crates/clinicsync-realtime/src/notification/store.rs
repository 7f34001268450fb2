//! Bounded, persistent notification log.

use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use clinicsync_core::config::NotificationsConfig;
use clinicsync_core::types::NotificationId;
use clinicsync_entity::notification::{NotificationKind, NotificationRecord};

use super::formatter::FormattedNotification;
use super::outcome::{Durability, StoreOutcome};
use super::toast::ToastScheduler;
use super::view::{BadgeView, NotificationListView, unread_count};
use crate::bus::{BusContext, ListenerId};
use crate::surface::NotificationSurface;

/// The notification log of one context.
///
/// The log lives under `storage_key` in the shared register as a JSON
/// array, newest first, at most `capacity` long. Every operation re-reads
/// it, so the log always reflects writes made by other contexts. Writes go
/// through the bus, and other contexts re-render when they see them.
///
/// Persistence failures are logged and never returned as errors. The store
/// then works on its in-memory copy, and the returned [`StoreOutcome`] is
/// marked degraded.
#[derive(Debug)]
pub struct NotificationStore {
    context: Arc<BusContext>,
    config: NotificationsConfig,
    surface: Arc<dyn NotificationSurface>,
    toasts: ToastScheduler,
    /// Last log this context read or wrote.
    mirror: Mutex<Vec<NotificationRecord>>,
    listener: ListenerId,
}

impl NotificationStore {
    /// Create the store and start re-rendering on foreign writes.
    pub fn new(
        context: Arc<BusContext>,
        config: NotificationsConfig,
        surface: Arc<dyn NotificationSurface>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|weak: &Weak<Self>| {
            let weak = weak.clone();
            let listener = context.on_change(&config.storage_key, move |_| {
                let Some(store) = weak.upgrade() else {
                    return;
                };
                match tokio::runtime::Handle::try_current() {
                    Ok(handle) => {
                        handle.spawn(async move {
                            store.render().await;
                        });
                    }
                    Err(_) => warn!("No runtime to re-render notifications on"),
                }
            });

            let toasts = ToastScheduler::new(
                Arc::clone(&surface),
                Duration::from_millis(config.toast_lifetime_ms),
            );

            Self {
                context,
                config,
                surface,
                toasts,
                mirror: Mutex::new(Vec::new()),
                listener,
            }
        })
    }

    /// Append a notification, newest first, evicting beyond capacity.
    ///
    /// Re-renders the list and badge and shows a toast.
    pub async fn add(
        &self,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> StoreOutcome<NotificationRecord> {
        let record = NotificationRecord::new(kind, title, message);

        let mut mirror = self.mirror.lock().await;
        let (mut records, read) = self.load(&mirror).await;
        records.insert(0, record.clone());
        records.truncate(self.config.capacity);
        let written = self.save(&records).await;
        *mirror = records.clone();
        drop(mirror);

        self.render_records(&records);
        self.toasts.show(&record);
        info!(id = %record.id, kind = %record.kind, "Notification added");

        outcome(record, read, written)
    }

    /// [`add`](Self::add) a canned notification.
    pub async fn add_formatted(
        &self,
        notification: FormattedNotification,
    ) -> StoreOutcome<NotificationRecord> {
        self.add(notification.kind, notification.title, notification.message)
            .await
    }

    /// The current log, newest first.
    pub async fn list(&self) -> StoreOutcome<Vec<NotificationRecord>> {
        let mut mirror = self.mirror.lock().await;
        let (records, read) = self.load(&mirror).await;
        *mirror = records.clone();
        outcome(records, read, Durability::Persisted)
    }

    /// Mark a record read. Returns whether anything changed.
    ///
    /// Unknown ids and records already read are left alone.
    pub async fn mark_read(&self, id: NotificationId) -> StoreOutcome<bool> {
        let mut mirror = self.mirror.lock().await;
        let (mut records, read) = self.load(&mirror).await;

        let Some(record) = records.iter_mut().find(|r| r.id == id && r.is_unread()) else {
            *mirror = records;
            return outcome(false, read, Durability::Persisted);
        };
        record.read = true;

        let written = self.save(&records).await;
        *mirror = records.clone();
        drop(mirror);

        self.render_records(&records);
        debug!(%id, "Notification marked read");
        outcome(true, read, written)
    }

    /// Empty the log.
    pub async fn clear_all(&self) -> StoreOutcome<()> {
        let mut mirror = self.mirror.lock().await;
        let written = self.save(&[]).await;
        mirror.clear();
        drop(mirror);

        self.render_records(&[]);
        info!("Notifications cleared");
        outcome((), Durability::Persisted, written)
    }

    /// Number of unread records, counted from the current log.
    pub async fn unread_count(&self) -> StoreOutcome<usize> {
        self.list().await.map(|records| unread_count(&records))
    }

    /// Re-render the list and badge from the current log.
    pub async fn render(&self) {
        let records = self.list().await.into_value();
        self.render_records(&records);
    }

    fn render_records(&self, records: &[NotificationRecord]) {
        self.surface
            .render_list(&NotificationListView::derive(records, Utc::now()));
        self.surface.render_badge(&BadgeView::derive(records));
    }

    async fn load(&self, fallback: &[NotificationRecord]) -> (Vec<NotificationRecord>, Durability) {
        let raw = match self.context.get(&self.config.storage_key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return (Vec::new(), Durability::Persisted),
            Err(e) => {
                warn!(error = %e, "Failed to read notifications, using in-memory copy");
                return (fallback.to_vec(), degraded(e));
            }
        };
        match serde_json::from_str::<Vec<NotificationRecord>>(&raw) {
            Ok(mut records) => {
                records.truncate(self.config.capacity);
                (records, Durability::Persisted)
            }
            Err(e) => {
                warn!(error = %e, "Stored notifications are unreadable, using in-memory copy");
                (fallback.to_vec(), degraded(e))
            }
        }
    }

    async fn save(&self, records: &[NotificationRecord]) -> Durability {
        let raw = match serde_json::to_string(records) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Failed to serialize notifications");
                return degraded(e);
            }
        };
        match self.context.set(&self.config.storage_key, &raw).await {
            Ok(_) => Durability::Persisted,
            Err(e) => {
                warn!(error = %e, "Failed to save notifications, keeping them in memory");
                degraded(e)
            }
        }
    }
}

impl Drop for NotificationStore {
    fn drop(&mut self) {
        self.context.unsubscribe(self.listener);
    }
}

fn degraded(reason: impl std::fmt::Display) -> Durability {
    Durability::Degraded {
        reason: reason.to_string(),
    }
}

fn outcome<T>(value: T, read: Durability, written: Durability) -> StoreOutcome<T> {
    match (read, written) {
        (Durability::Degraded { reason }, _) | (_, Durability::Degraded { reason }) => {
            StoreOutcome::degraded(value, reason)
        }
        _ => StoreOutcome::persisted(value),
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::bus::PersistentKeyValueBus;
    use crate::surface::RecordingSurface;
    use clinicsync_core::config::BusConfig;
    use clinicsync_core::error::AppError;
    use clinicsync_core::result::AppResult;
    use clinicsync_core::traits::kv_store::KeyValueStore;
    use clinicsync_storage::memory::MemoryKeyValueStore;

    fn store_with(
        backing: Arc<dyn KeyValueStore>,
    ) -> (Arc<NotificationStore>, Arc<RecordingSurface>) {
        let bus = PersistentKeyValueBus::new(backing, BusConfig::default());
        let surface = Arc::new(RecordingSurface::new());
        let store = NotificationStore::new(
            Arc::new(bus.attach()),
            NotificationsConfig::default(),
            surface.clone(),
        );
        (store, surface)
    }

    fn memory_store() -> (Arc<NotificationStore>, Arc<RecordingSurface>) {
        store_with(Arc::new(MemoryKeyValueStore::new()))
    }

    /// A register that is always unavailable.
    #[derive(Debug)]
    struct BrokenStore;

    #[async_trait]
    impl KeyValueStore for BrokenStore {
        fn provider_type(&self) -> &str {
            "broken"
        }
        async fn get(&self, _key: &str) -> AppResult<Option<String>> {
            Err(AppError::persistence("quota exceeded"))
        }
        async fn set(&self, _key: &str, _value: &str) -> AppResult<()> {
            Err(AppError::persistence("quota exceeded"))
        }
        async fn remove(&self, _key: &str) -> AppResult<()> {
            Err(AppError::persistence("quota exceeded"))
        }
        async fn health_check(&self) -> AppResult<bool> {
            Ok(false)
        }
    }

    #[tokio::test]
    async fn test_booking_end_to_end() {
        let (store, _) = memory_store();
        let added = store
            .add(
                NotificationKind::Booking,
                "Appointment Confirmed!",
                "Your consultation is scheduled for 2024-01-15 at 10:00 AM",
            )
            .await;
        assert!(!added.is_degraded());

        let list = store.list().await.into_value();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].kind, NotificationKind::Booking);
        assert_eq!(list[0].title, "Appointment Confirmed!");
        assert!(!list[0].read);
        assert_eq!(store.unread_count().await.value, 1);

        assert!(store.mark_read(list[0].id).await.value);
        assert!(store.list().await.value[0].read);
        assert_eq!(store.unread_count().await.value, 0);
    }

    #[tokio::test]
    async fn test_newest_first_and_capacity() {
        let (store, _) = memory_store();
        let mut ids = Vec::new();
        for n in 0..51 {
            ids.push(store.add(NotificationKind::Info, format!("n{n}"), "m").await.value.id);
        }
        let list = store.list().await.value;
        assert_eq!(list.len(), 50);
        assert_eq!(list[0].title, "n50");
        assert_eq!(list[49].title, "n1");
        assert!(list.iter().all(|r| r.id != ids[0]));
    }

    #[tokio::test]
    async fn test_mark_read_idempotent() {
        let (store, surface) = memory_store();
        let first = store.add(NotificationKind::Info, "a", "m").await.value;
        store.add(NotificationKind::Info, "b", "m").await;

        assert!(store.mark_read(first.id).await.value);
        let once = store.unread_count().await.value;
        surface.drain();
        assert!(!store.mark_read(first.id).await.value);
        assert_eq!(store.unread_count().await.value, once);
        assert_eq!(once, 1);
        // A no-op does not re-render.
        assert!(surface.calls().is_empty());

        assert!(!store.mark_read(NotificationId::new()).await.value);
    }

    #[tokio::test]
    async fn test_unread_count_matches_list() {
        let (store, _) = memory_store();
        for n in 0..5 {
            let r = store.add(NotificationKind::Info, format!("{n}"), "m").await.value;
            if n % 2 == 0 {
                store.mark_read(r.id).await;
            }
            let list = store.list().await.value;
            let unread = list.iter().filter(|r| !r.read).count();
            assert_eq!(store.unread_count().await.value, unread);
        }
        store.clear_all().await;
        assert_eq!(store.unread_count().await.value, 0);
        assert!(store.list().await.value.is_empty());
    }

    #[tokio::test]
    async fn test_add_renders_list_badge_and_toast() {
        let (store, surface) = memory_store();
        store.add(NotificationKind::Success, "Saved", "ok").await;

        let list = surface.last_list().unwrap();
        assert_eq!(list.items.len(), 1);
        assert_eq!(list.items[0].icon, "✅");
        assert_eq!(surface.last_badge().unwrap().count, 1);
        assert_eq!(surface.visible_toasts().len(), 1);

        store.clear_all().await;
        assert!(surface.last_list().unwrap().empty);
        assert!(!surface.last_badge().unwrap().visible);
    }

    #[tokio::test]
    async fn test_render_twice_is_identical() {
        let (store, surface) = memory_store();
        store.add(NotificationKind::Info, "a", "m").await;
        surface.drain();
        store.render().await;
        store.render().await;
        let calls = surface.calls();
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[0], calls[2]);
        assert_eq!(calls[1], calls[3]);
    }

    #[tokio::test]
    async fn test_broken_storage_degrades_to_memory() {
        let (store, _) = store_with(Arc::new(BrokenStore));
        let added = store.add(NotificationKind::Info, "a", "m").await;
        assert!(added.is_degraded());

        let list = store.list().await;
        assert!(list.is_degraded());
        assert_eq!(list.value.len(), 1);
        assert!(store.mark_read(added.value.id).await.value);
        assert_eq!(store.unread_count().await.value, 0);
    }

    #[tokio::test]
    async fn test_corrupt_log_is_not_fatal() {
        let backing = MemoryKeyValueStore::new();
        backing.set("skincare_notifications", "{not json").await.unwrap();
        let (store, _) = store_with(Arc::new(backing));
        let list = store.list().await;
        assert!(list.is_degraded());
        assert!(list.value.is_empty());
        // The next write replaces the corrupt value.
        store.add(NotificationKind::Info, "a", "m").await;
        assert!(!store.list().await.is_degraded());
    }
}
