//! Background polling for writes made by other processes.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{debug, info};

use super::shared::PersistentKeyValueBus;

/// Poll `keys` every `interval` until shutdown is signalled.
///
/// Changes are coalesced: a key written several times between two rounds
/// is delivered once, with its latest value.
pub async fn run_external_poller(
    bus: Arc<PersistentKeyValueBus>,
    keys: Vec<String>,
    interval: Duration,
    mut shutdown: broadcast::Receiver<()>,
) {
    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

    info!(?interval, keys = ?keys, "External change poller started");
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let delivered = bus.poll_external(&keys).await;
                if delivered > 0 {
                    debug!(delivered, "Delivered external changes");
                }
            }
            _ = shutdown.recv() => break,
        }
    }
    debug!("External change poller stopped");
}

/// Spawn [`run_external_poller`] on the current runtime.
pub fn spawn_external_poller(
    bus: Arc<PersistentKeyValueBus>,
    keys: Vec<String>,
    interval: Duration,
    shutdown: broadcast::Receiver<()>,
) -> JoinHandle<()> {
    tokio::spawn(run_external_poller(bus, keys, interval, shutdown))
}
