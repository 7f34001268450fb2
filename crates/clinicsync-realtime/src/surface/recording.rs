//! Surface that remembers every call.

use std::sync::Mutex;

use clinicsync_catalog::view::CatalogView;

use super::{CatalogSurface, Notice, NotificationSurface};
use crate::notification::toast::{ToastId, ToastView};
use crate::notification::view::{BadgeView, NotificationListView};

/// One call made against a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    List(NotificationListView),
    Badge(BadgeView),
    Toast(ToastView),
    DismissToast(ToastId),
    Catalog(CatalogView),
    Notice(Notice),
}

/// Records every render so callers can inspect what was drawn.
///
/// The CLI's `watch` command prints from it and tests assert on it.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    calls: Mutex<Vec<SurfaceCall>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, call: SurfaceCall) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
    }

    /// Everything recorded so far, oldest first.
    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Take and clear the recorded calls.
    pub fn drain(&self) -> Vec<SurfaceCall> {
        std::mem::take(&mut *self.calls.lock().unwrap_or_else(|e| e.into_inner()))
    }

    /// The most recent notification list render.
    pub fn last_list(&self) -> Option<NotificationListView> {
        self.calls().into_iter().rev().find_map(|c| match c {
            SurfaceCall::List(v) => Some(v),
            _ => None,
        })
    }

    /// The most recent badge render.
    pub fn last_badge(&self) -> Option<BadgeView> {
        self.calls().into_iter().rev().find_map(|c| match c {
            SurfaceCall::Badge(b) => Some(b),
            _ => None,
        })
    }

    /// The most recent catalog render.
    pub fn last_catalog(&self) -> Option<CatalogView> {
        self.calls().into_iter().rev().find_map(|c| match c {
            SurfaceCall::Catalog(v) => Some(v),
            _ => None,
        })
    }

    /// Every notice shown, oldest first.
    pub fn notices(&self) -> Vec<Notice> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                SurfaceCall::Notice(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    /// Toasts shown and not yet dismissed.
    pub fn visible_toasts(&self) -> Vec<ToastView> {
        let mut shown = Vec::new();
        for call in self.calls() {
            match call {
                SurfaceCall::Toast(t) => shown.push(t),
                SurfaceCall::DismissToast(id) => shown.retain(|t: &ToastView| t.id != id),
                _ => {}
            }
        }
        shown
    }
}

impl NotificationSurface for RecordingSurface {
    fn render_list(&self, view: &NotificationListView) {
        self.push(SurfaceCall::List(view.clone()));
    }

    fn render_badge(&self, badge: &BadgeView) {
        self.push(SurfaceCall::Badge(*badge));
    }

    fn show_toast(&self, toast: &ToastView) {
        self.push(SurfaceCall::Toast(toast.clone()));
    }

    fn dismiss_toast(&self, id: ToastId) {
        self.push(SurfaceCall::DismissToast(id));
    }
}

impl CatalogSurface for RecordingSurface {
    fn render_catalog(&self, view: &CatalogView) {
        self.push(SurfaceCall::Catalog(view.clone()));
    }

    fn show_notice(&self, notice: &Notice) {
        self.push(SurfaceCall::Notice(notice.clone()));
    }
}
