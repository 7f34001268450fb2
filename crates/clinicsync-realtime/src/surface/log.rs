//! Surface that renders into the log.

use tracing::{error, info};

use clinicsync_catalog::view::CatalogView;

use super::{CatalogSurface, Notice, NoticeLevel, NotificationSurface};
use crate::notification::toast::{ToastId, ToastView};
use crate::notification::view::{BadgeView, NotificationListView};

/// Writes every render as a structured log event.
///
/// Used by the session host, which has no screen to draw on.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSurface;

impl NotificationSurface for LogSurface {
    fn render_list(&self, view: &NotificationListView) {
        if view.empty {
            info!(target: "clinicsync::surface", "Notifications: none");
            return;
        }
        for item in &view.items {
            info!(
                target: "clinicsync::surface",
                id = %item.id,
                kind = %item.kind,
                unread = item.unread,
                when = %item.time_ago,
                "{} {}: {}",
                item.icon,
                item.title,
                item.message
            );
        }
    }

    fn render_badge(&self, badge: &BadgeView) {
        info!(
            target: "clinicsync::surface",
            unread = badge.count,
            visible = badge.visible,
            "Badge"
        );
    }

    fn show_toast(&self, toast: &ToastView) {
        info!(
            target: "clinicsync::surface",
            toast = %toast.id,
            "{} {}: {}",
            toast.icon,
            toast.title,
            toast.message
        );
    }

    fn dismiss_toast(&self, id: ToastId) {
        info!(target: "clinicsync::surface", toast = %id, "Toast dismissed");
    }
}

impl CatalogSurface for LogSurface {
    fn render_catalog(&self, view: &CatalogView) {
        info!(
            target: "clinicsync::surface",
            visible = view.cards.len(),
            total = view.total,
            "Catalog rendered"
        );
        for card in &view.cards {
            info!(
                target: "clinicsync::surface",
                id = %card.id,
                city = %card.city,
                rating = %card.stars,
                link = %card.detail_link,
                "{}",
                card.name
            );
        }
    }

    fn show_notice(&self, notice: &Notice) {
        match notice.level {
            NoticeLevel::Info => info!(target: "clinicsync::surface", "{}", notice.message),
            NoticeLevel::Error => error!(target: "clinicsync::surface", "{}", notice.message),
        }
    }
}
