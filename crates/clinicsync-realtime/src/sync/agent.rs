//! Catalog sync agent.

use std::sync::{Arc, Mutex, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use clinicsync_catalog::client::RemoteCatalogClient;
use clinicsync_catalog::view::CatalogView;
use clinicsync_core::config::SyncConfig;
use clinicsync_entity::clinic::Clinic;

use super::sequence::RequestSequencer;
use super::state::SyncState;
use crate::bus::{BusContext, ListenerId};
use crate::surface::{CatalogSurface, Notice};

/// Notice shown when another context invalidates the catalog.
pub const UPDATED_NOTICE: &str = "Clinic information has been updated";

/// What caused a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshTrigger {
    Initial,
    Invalidation,
    Timer,
    Manual,
}

/// Result of one refresh request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The response replaced the snapshot and was rendered.
    Applied { visible: usize },
    /// The fetch failed; the previous render was kept.
    Failed { reason: String },
    /// A later-issued request completed first; the response was dropped.
    Discarded,
}

/// The cached catalog, replaced wholesale on each applied fetch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogSnapshot {
    pub clinics: Vec<Clinic>,
    pub fetched_at: DateTime<Utc>,
    /// Issuance number of the request that produced it.
    pub seq: u64,
}

/// Refreshes one context's catalog snapshot and renders it.
///
/// Refreshes are requested by bus invalidations, a fallback timer, or
/// directly. Requests are never cancelled; when several overlap, the one
/// issued last wins and older responses arriving afterwards are discarded.
/// Fetch failures move the agent to [`SyncState::Failed`] and show a notice,
/// but never propagate to the caller and never clear what is on screen.
#[derive(Debug)]
pub struct SyncAgent {
    client: Arc<dyn RemoteCatalogClient>,
    surface: Arc<dyn CatalogSurface>,
    config: SyncConfig,
    state: watch::Sender<SyncState>,
    snapshot: RwLock<Option<CatalogSnapshot>>,
    sequencer: RequestSequencer,
    triggers: mpsc::UnboundedSender<RefreshTrigger>,
    trigger_rx: Mutex<Option<mpsc::UnboundedReceiver<RefreshTrigger>>>,
}

impl SyncAgent {
    /// Create an agent in [`SyncState::Idle`] without starting it.
    ///
    /// The `Idle -> Loading` start and the initial fetch happen when the
    /// loop begins in [`spawn`](Self::spawn) or [`run`](Self::run);
    /// [`SessionContext::open`](crate::session::SessionContext::open) spawns
    /// every agent it creates.
    pub fn new(
        client: Arc<dyn RemoteCatalogClient>,
        surface: Arc<dyn CatalogSurface>,
        config: SyncConfig,
    ) -> Arc<Self> {
        let (state, _) = watch::channel(SyncState::Idle);
        let (triggers, trigger_rx) = mpsc::unbounded_channel();
        Arc::new(Self {
            client,
            surface,
            config,
            state,
            snapshot: RwLock::new(None),
            sequencer: RequestSequencer::new(),
            triggers,
            trigger_rx: Mutex::new(Some(trigger_rx)),
        })
    }

    /// Current state.
    pub fn state(&self) -> SyncState {
        self.state.borrow().clone()
    }

    /// Watch state transitions.
    pub fn watch_state(&self) -> watch::Receiver<SyncState> {
        self.state.subscribe()
    }

    /// The last applied snapshot.
    pub fn snapshot(&self) -> Option<CatalogSnapshot> {
        self.snapshot
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// The view derived from the last applied snapshot.
    pub fn view(&self) -> Option<CatalogView> {
        self.snapshot
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|s| CatalogView::derive(&s.clinics, &self.config.visible_statuses))
    }

    /// Ask the running loop for a refresh.
    pub fn request(&self, trigger: RefreshTrigger) {
        if self.triggers.send(trigger).is_err() {
            debug!(?trigger, "Refresh requested after the agent loop ended");
        }
    }

    /// Refresh on every event published on `topic` by another context.
    ///
    /// The event payload is only a hint; the catalog is always re-fetched.
    pub fn attach(&self, context: &BusContext, topic: &str) -> ListenerId {
        let surface = Arc::clone(&self.surface);
        let triggers = self.triggers.clone();
        context.subscribe(topic, move |event| {
            debug!(topic = %event.topic, timestamp = event.timestamp, "Catalog invalidated");
            surface.show_notice(&Notice::info(UPDATED_NOTICE));
            let _ = triggers.send(RefreshTrigger::Invalidation);
        })
    }

    /// Fetch the catalog once and apply the response if it is still current.
    pub async fn refresh(&self, trigger: RefreshTrigger) -> RefreshOutcome {
        let ticket = self.sequencer.issue();
        self.state.send_replace(SyncState::Loading);
        debug!(seq = ticket.seq(), ?trigger, "Catalog refresh issued");

        let result = self.client.list().await;

        let outcome = self.sequencer.try_complete(ticket, |latest| match result {
            Ok(clinics) => {
                let view = CatalogView::derive(&clinics, &self.config.visible_statuses);
                *self.snapshot.write().unwrap_or_else(|e| e.into_inner()) = Some(CatalogSnapshot {
                    clinics,
                    fetched_at: Utc::now(),
                    seq: ticket.seq(),
                });
                self.surface.render_catalog(&view);
                if latest {
                    self.state.send_replace(SyncState::Ready);
                }
                RefreshOutcome::Applied {
                    visible: view.cards.len(),
                }
            }
            Err(e) => {
                warn!(seq = ticket.seq(), error = %e, "Catalog refresh failed");
                self.surface
                    .show_notice(&Notice::error(format!("Failed to load clinics: {}", e.message)));
                if latest {
                    self.state.send_replace(SyncState::Failed {
                        reason: e.message.clone(),
                    });
                }
                RefreshOutcome::Failed { reason: e.message }
            }
        });

        match outcome {
            Some(outcome) => {
                info!(seq = ticket.seq(), ?trigger, ?outcome, "Catalog refresh completed");
                outcome
            }
            None => {
                debug!(seq = ticket.seq(), "Stale catalog response discarded");
                RefreshOutcome::Discarded
            }
        }
    }

    /// Spawn [`run`](Self::run) on the current runtime.
    pub fn spawn(self: &Arc<Self>, shutdown: broadcast::Receiver<()>) -> JoinHandle<()> {
        tokio::spawn(Arc::clone(self).run(shutdown))
    }

    /// Refresh immediately, then on every requested trigger and every
    /// refresh interval, until shutdown.
    ///
    /// Each refresh runs in its own task, so a slow fetch never delays the
    /// next trigger.
    pub async fn run(self: Arc<Self>, mut shutdown: broadcast::Receiver<()>) {
        let Some(mut triggers) = self
            .trigger_rx
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
        else {
            warn!("Sync agent loop is already running");
            return;
        };

        let period = self.config.refresh_interval();
        let mut timer = time::interval_at(Instant::now() + period, period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(?period, "Sync agent started");
        self.spawn_refresh(RefreshTrigger::Initial);

        loop {
            tokio::select! {
                Some(trigger) = triggers.recv() => self.spawn_refresh(trigger),
                _ = timer.tick() => self.spawn_refresh(RefreshTrigger::Timer),
                _ = shutdown.recv() => break,
            }
        }

        info!("Sync agent stopped");
    }

    fn spawn_refresh(self: &Arc<Self>, trigger: RefreshTrigger) {
        let agent = Arc::clone(self);
        tokio::spawn(async move {
            agent.refresh(trigger).await;
        });
    }
}
