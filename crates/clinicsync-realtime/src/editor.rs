//! Admin-side catalog edits: commit, then invalidate other contexts.

use std::sync::Arc;

use tracing::{info, warn};

use clinicsync_catalog::client::RemoteCatalogClient;
use clinicsync_core::result::AppResult;
use clinicsync_entity::clinic::{Clinic, ClinicDraft, ClinicId};

use crate::bus::BusContext;
use crate::notification::{NotificationFormatter, NotificationStore};
use crate::sync::{RefreshOutcome, RefreshTrigger, SyncAgent};

/// What a successful edit did after committing.
#[derive(Debug, Clone, PartialEq)]
pub struct EditReport {
    /// The catalog as re-fetched after the commit, empty if that failed.
    pub clinics: Vec<Clinic>,
    /// Catalog-topic subscribers in other contexts that saw the invalidation.
    pub delivered: usize,
}

/// Commits clinic edits and tells every other context to re-fetch.
///
/// The outcome of each edit is also appended to the notification log.
#[derive(Debug)]
pub struct CatalogEditor {
    context: Arc<BusContext>,
    client: Arc<dyn RemoteCatalogClient>,
    notifications: Arc<NotificationStore>,
    agent: Option<Arc<SyncAgent>>,
    topic: String,
}

impl CatalogEditor {
    pub fn new(
        context: Arc<BusContext>,
        client: Arc<dyn RemoteCatalogClient>,
        notifications: Arc<NotificationStore>,
        topic: impl Into<String>,
    ) -> Self {
        Self {
            context,
            client,
            notifications,
            agent: None,
            topic: topic.into(),
        }
    }

    /// Refresh this agent after each commit instead of listing directly.
    pub fn with_agent(mut self, agent: Arc<SyncAgent>) -> Self {
        self.agent = Some(agent);
        self
    }

    pub async fn create(&self, draft: &ClinicDraft) -> AppResult<EditReport> {
        let committed = match draft.check() {
            Ok(()) => self.client.create(draft).await,
            Err(e) => Err(e),
        };
        self.finish(committed, "Clinic saved successfully!", "Error saving clinic")
            .await
    }

    pub async fn update(&self, id: &ClinicId, draft: &ClinicDraft) -> AppResult<EditReport> {
        let committed = match draft.check() {
            Ok(()) => self.client.update(id, draft).await,
            Err(e) => Err(e),
        };
        self.finish(committed, "Clinic saved successfully!", "Error saving clinic")
            .await
    }

    pub async fn delete(&self, id: &ClinicId) -> AppResult<EditReport> {
        let committed = self.client.delete(id).await;
        self.finish(committed, "Clinic deleted successfully!", "Error deleting clinic")
            .await
    }

    async fn finish(
        &self,
        committed: AppResult<()>,
        success: &str,
        failure: &str,
    ) -> AppResult<EditReport> {
        if let Err(e) = committed {
            warn!(error = %e, "Catalog edit failed");
            self.notifications
                .add_formatted(NotificationFormatter::error(&format!("{failure}: {}", e.message)))
                .await;
            return Err(e);
        }

        let clinics = self.refetch().await;
        let delivered = match self.context.publish(&self.topic, &clinics).await {
            Ok(n) => n,
            Err(e) => {
                warn!(error = %e, topic = %self.topic, "Failed to publish catalog invalidation");
                0
            }
        };
        info!(topic = %self.topic, delivered, "Catalog edit committed");

        self.notifications
            .add_formatted(NotificationFormatter::success(success))
            .await;
        Ok(EditReport { clinics, delivered })
    }

    /// Best-effort read-back of the catalog after a commit.
    async fn refetch(&self) -> Vec<Clinic> {
        if let Some(agent) = &self.agent {
            return match agent.refresh(RefreshTrigger::Manual).await {
                RefreshOutcome::Applied { .. } | RefreshOutcome::Discarded => agent
                    .snapshot()
                    .map(|s| s.clinics)
                    .unwrap_or_default(),
                RefreshOutcome::Failed { .. } => Vec::new(),
            };
        }
        match self.client.list().await {
            Ok(clinics) => clinics,
            Err(e) => {
                warn!(error = %e, "Could not re-fetch catalog after edit");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::bus::PersistentKeyValueBus;
    use crate::surface::RecordingSurface;
    use clinicsync_catalog::memory::InMemoryCatalogClient;
    use clinicsync_core::config::{BusConfig, NotificationsConfig};
    use clinicsync_core::error::{AppError, ErrorKind};
    use clinicsync_entity::notification::NotificationKind;
    use clinicsync_storage::memory::MemoryKeyValueStore;

    struct Fixture {
        editor: CatalogEditor,
        catalog: Arc<InMemoryCatalogClient>,
        notifications: Arc<NotificationStore>,
        invalidations: Arc<AtomicUsize>,
        _public: BusContext,
    }

    fn fixture() -> Fixture {
        let bus = PersistentKeyValueBus::new(
            Arc::new(MemoryKeyValueStore::new()),
            BusConfig::default(),
        );
        let admin = Arc::new(bus.attach());
        let public = bus.attach();
        let invalidations = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&invalidations);
        public.subscribe("catalog_update", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let catalog = Arc::new(InMemoryCatalogClient::new());
        let notifications = NotificationStore::new(
            Arc::clone(&admin),
            NotificationsConfig::default(),
            Arc::new(RecordingSurface::new()),
        );
        let editor = CatalogEditor::new(
            admin,
            catalog.clone(),
            Arc::clone(&notifications),
            "catalog_update",
        );
        Fixture {
            editor,
            catalog,
            notifications,
            invalidations,
            _public: public,
        }
    }

    #[tokio::test]
    async fn test_create_publishes_and_notifies() {
        let f = fixture();
        let report = f.editor.create(&ClinicDraft::new("Glow", "Leeds")).await.unwrap();
        assert_eq!(report.clinics.len(), 1);
        assert_eq!(report.delivered, 1);
        assert_eq!(f.invalidations.load(Ordering::SeqCst), 1);

        let log = f.notifications.list().await.value;
        assert_eq!(log[0].kind, NotificationKind::Success);
        assert_eq!(log[0].message, "Clinic saved successfully!");
    }

    #[tokio::test]
    async fn test_failed_commit_publishes_nothing() {
        let f = fixture();
        f.catalog.fail_with(Some(AppError::backend("duplicate name")));
        let err = f.editor.create(&ClinicDraft::new("Glow", "Leeds")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Backend);
        assert_eq!(f.invalidations.load(Ordering::SeqCst), 0);

        let log = f.notifications.list().await.value;
        assert_eq!(log[0].kind, NotificationKind::Error);
        assert_eq!(log[0].message, "Error saving clinic: duplicate name");
    }

    #[tokio::test]
    async fn test_invalid_draft_is_rejected_before_commit() {
        let f = fixture();
        let err = f.editor.create(&ClinicDraft::new("", "Leeds")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(f.catalog.list().await.unwrap().is_empty());
        assert_eq!(f.invalidations.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_delete_and_update() {
        let f = fixture();
        f.editor.create(&ClinicDraft::new("Glow", "Leeds")).await.unwrap();
        let id = f.catalog.list().await.unwrap()[0].id.clone();

        let report = f
            .editor
            .update(&id, &ClinicDraft::new("Glow Plus", "Leeds"))
            .await
            .unwrap();
        assert_eq!(report.clinics[0].name, "Glow Plus");

        let report = f.editor.delete(&id).await.unwrap();
        assert!(report.clinics.is_empty());
        assert_eq!(f.invalidations.load(Ordering::SeqCst), 3);
        assert_eq!(
            f.notifications.list().await.value[0].message,
            "Clinic deleted successfully!"
        );
    }
}
