//! Self-dismissing toasts.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::debug;

use clinicsync_entity::notification::{NotificationKind, NotificationRecord};

use crate::surface::NotificationSurface;

/// Identifies a toast within one scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ToastId(u64);

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "toast-{}", self.0)
    }
}

/// A transient copy of a notification, independent of the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToastView {
    pub id: ToastId,
    pub kind: NotificationKind,
    pub icon: &'static str,
    pub title: String,
    pub message: String,
}

/// Shows toasts and dismisses each after a fixed lifetime.
#[derive(Debug)]
pub struct ToastScheduler {
    surface: Arc<dyn NotificationSurface>,
    lifetime: Duration,
    next_id: AtomicU64,
}

impl ToastScheduler {
    pub fn new(surface: Arc<dyn NotificationSurface>, lifetime: Duration) -> Self {
        Self {
            surface,
            lifetime,
            next_id: AtomicU64::new(1),
        }
    }

    /// Configured toast lifetime.
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Show a toast for `record` and schedule its dismissal.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn show(&self, record: &NotificationRecord) -> (ToastId, JoinHandle<()>) {
        let id = ToastId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.surface.show_toast(&ToastView {
            id,
            kind: record.kind,
            icon: record.kind.icon(),
            title: record.title.clone(),
            message: record.message.clone(),
        });

        let surface = Arc::clone(&self.surface);
        let lifetime = self.lifetime;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(lifetime).await;
            surface.dismiss_toast(id);
            debug!(toast = %id, "Toast expired");
        });
        (id, handle)
    }
}
