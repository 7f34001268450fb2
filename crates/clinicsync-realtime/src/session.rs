//! One open page: its bus context and everything built on it.

use std::sync::{Arc, Mutex};

use futures::future::join_all;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use clinicsync_catalog::client::RemoteCatalogClient;
use clinicsync_core::config::AppConfig;
use clinicsync_core::result::AppResult;
use clinicsync_core::types::ContextId;

use crate::bus::{BusContext, PersistentKeyValueBus};
use crate::editor::CatalogEditor;
use crate::notification::NotificationStore;
use crate::surface::{CatalogSurface, NotificationSurface};
use crate::sync::SyncAgent;

/// Render targets of one page.
#[derive(Debug, Clone)]
pub struct SessionSurfaces {
    pub notifications: Arc<dyn NotificationSurface>,
    /// Pages without a clinic grid pass `None` and get no sync agent.
    pub catalog: Option<Arc<dyn CatalogSurface>>,
}

/// A browsing context with its notification store, catalog editor and,
/// when it shows the catalog, a running sync agent.
///
/// Everything is constructed here once per context and shared by handle;
/// nothing lives in globals. Dropping the session detaches it from the bus
/// once every handle is gone; call [`shutdown`](Self::shutdown) to stop the
/// agent loop first.
pub struct SessionContext {
    pub context: Arc<BusContext>,
    pub notifications: Arc<NotificationStore>,
    pub agent: Option<Arc<SyncAgent>>,
    pub editor: Arc<CatalogEditor>,
    shutdown_tx: broadcast::Sender<()>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("context", &self.context.id())
            .field("syncing", &self.agent.is_some())
            .finish()
    }
}

impl SessionContext {
    /// Attach a context to `bus`, render its notifications and start its
    /// sync agent.
    pub async fn open(
        bus: &Arc<PersistentKeyValueBus>,
        config: &AppConfig,
        client: Arc<dyn RemoteCatalogClient>,
        surfaces: SessionSurfaces,
    ) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        let context = Arc::new(bus.attach());

        let notifications = NotificationStore::new(
            Arc::clone(&context),
            config.notifications.clone(),
            surfaces.notifications,
        );
        notifications.render().await;

        let agent = surfaces.catalog.map(|surface| {
            let agent = SyncAgent::new(Arc::clone(&client), surface, config.sync.clone());
            agent.attach(&context, &config.bus.topic);
            agent
        });

        let mut editor = CatalogEditor::new(
            Arc::clone(&context),
            client,
            Arc::clone(&notifications),
            config.bus.topic.clone(),
        );
        let mut tasks = Vec::new();
        if let Some(agent) = &agent {
            editor = editor.with_agent(Arc::clone(agent));
            tasks.push(agent.spawn(shutdown_tx.subscribe()));
        }

        info!(context = %context.id(), syncing = agent.is_some(), "Session context opened");

        Self {
            context,
            notifications,
            agent,
            editor: Arc::new(editor),
            shutdown_tx,
            tasks: Mutex::new(tasks),
        }
    }

    /// This context's bus identifier.
    pub fn id(&self) -> ContextId {
        self.context.id()
    }

    /// A receiver that fires when the session shuts down.
    pub fn shutdown_receiver(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Track a background task so [`shutdown`](Self::shutdown) waits for it.
    pub fn track(&self, task: JoinHandle<()>) {
        self.tasks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(task);
    }

    /// Stop background tasks and wait for them.
    ///
    /// Refreshes already in flight are not cancelled; they finish on their
    /// own and are applied or discarded as usual.
    pub async fn shutdown(&self) -> AppResult<()> {
        info!(context = %self.id(), "Shutting down session context");
        let _ = self.shutdown_tx.send(());

        let tasks = std::mem::take(&mut *self.tasks.lock().unwrap_or_else(|e| e.into_inner()));
        for result in join_all(tasks).await {
            if let Err(e) = result {
                warn!(error = %e, "Session task ended abnormally");
            }
        }
        Ok(())
    }
}
