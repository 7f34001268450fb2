//! Render targets the subsystem draws onto.
//!
//! The subsystem owns no markup. It derives complete views and hands them
//! to a surface; rendering the same view twice must look the same.

pub mod log;
pub mod recording;

use serde::Serialize;

use clinicsync_catalog::view::CatalogView;

use crate::notification::toast::{ToastId, ToastView};
use crate::notification::view::{BadgeView, NotificationListView};

pub use log::LogSurface;
pub use recording::{RecordingSurface, SurfaceCall};

/// Severity of a non-blocking notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A transient, non-blocking message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Notification list container, badge and toast container.
pub trait NotificationSurface: Send + Sync + std::fmt::Debug + 'static {
    /// Replace the whole notification list.
    fn render_list(&self, view: &NotificationListView);
    /// Replace the unread badge.
    fn render_badge(&self, badge: &BadgeView);
    /// Show a toast.
    fn show_toast(&self, toast: &ToastView);
    /// Remove a toast if it is still shown.
    fn dismiss_toast(&self, id: ToastId);
}

/// Clinic grid and its notice area.
pub trait CatalogSurface: Send + Sync + std::fmt::Debug + 'static {
    /// Replace the whole clinic grid.
    fn render_catalog(&self, view: &CatalogView);
    /// Show a non-blocking notice above the grid.
    fn show_notice(&self, notice: &Notice);
}
