//! Shared helpers for multi-context integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use clinicsync_catalog::InMemoryCatalogClient;
use clinicsync_core::config::AppConfig;
use clinicsync_core::traits::kv_store::KeyValueStore;
use clinicsync_entity::clinic::{Clinic, ClinicStatus};
use clinicsync_realtime::{PersistentKeyValueBus, RecordingSurface, SessionContext, SessionSurfaces};
use clinicsync_storage::memory::MemoryKeyValueStore;

/// One open page and what it rendered.
pub struct Page {
    pub session: SessionContext,
    pub surface: Arc<RecordingSurface>,
}

/// A browser session: one register, one catalog, several pages.
pub struct TestSession {
    pub config: AppConfig,
    pub bus: Arc<PersistentKeyValueBus>,
    pub catalog: Arc<InMemoryCatalogClient>,
}

impl TestSession {
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryKeyValueStore::new()))
    }

    pub fn with_store(store: Arc<dyn KeyValueStore>) -> Self {
        let config = AppConfig::default();
        let bus = PersistentKeyValueBus::new(store, config.bus.clone());
        let catalog = Arc::new(InMemoryCatalogClient::with_clinics(vec![
            Clinic::new("1", "Elite Dermatology", ClinicStatus::Active),
            Clinic::new("2", "Closed For Works", ClinicStatus::Maintenance),
        ]));
        Self {
            config,
            bus,
            catalog,
        }
    }

    /// A page showing the clinic grid, with a running sync agent.
    pub async fn public_page(&self) -> Page {
        let surface = Arc::new(RecordingSurface::new());
        let session = SessionContext::open(
            &self.bus,
            &self.config,
            self.catalog.clone(),
            SessionSurfaces {
                notifications: surface.clone(),
                catalog: Some(surface.clone()),
            },
        )
        .await;
        Page { session, surface }
    }

    /// The admin panel: notifications and editor, no sync agent.
    pub async fn admin_page(&self) -> Page {
        let surface = Arc::new(RecordingSurface::new());
        let session = SessionContext::open(
            &self.bus,
            &self.config,
            self.catalog.clone(),
            SessionSurfaces {
                notifications: surface.clone(),
                catalog: None,
            },
        )
        .await;
        Page { session, surface }
    }
}

/// Let spawned tasks run; time is paused in these tests.
pub async fn settle() {
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
}
