//! Views derived from the notification log.

use chrono::{DateTime, Utc};
use serde::Serialize;

use clinicsync_core::types::NotificationId;
use clinicsync_entity::notification::{NotificationKind, NotificationRecord};

/// One row of the notification list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationItemView {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub icon: &'static str,
    pub title: String,
    pub message: String,
    pub time_ago: String,
    pub unread: bool,
}

/// The whole notification list, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationListView {
    pub items: Vec<NotificationItemView>,
    /// Show the empty state instead of rows.
    pub empty: bool,
}

impl NotificationListView {
    /// Derive the list as of `now`.
    pub fn derive(records: &[NotificationRecord], now: DateTime<Utc>) -> Self {
        let items = records
            .iter()
            .map(|r| NotificationItemView {
                id: r.id,
                kind: r.kind,
                icon: r.kind.icon(),
                title: r.title.clone(),
                message: r.message.clone(),
                time_ago: time_ago(r.timestamp, now),
                unread: r.is_unread(),
            })
            .collect::<Vec<_>>();
        Self {
            empty: items.is_empty(),
            items,
        }
    }
}

/// Unread counter. Hidden at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BadgeView {
    pub count: usize,
    pub visible: bool,
}

impl BadgeView {
    pub fn derive(records: &[NotificationRecord]) -> Self {
        let count = unread_count(records);
        Self {
            count,
            visible: count > 0,
        }
    }
}

/// Number of unread records.
pub fn unread_count(records: &[NotificationRecord]) -> usize {
    records.iter().filter(|r| r.is_unread()).count()
}

/// Coarse relative time, e.g. `3 minutes ago`.
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds().max(0);
    match secs {
        0..60 => "Just now".to_string(),
        60..3600 => format!("{} minutes ago", secs / 60),
        3600..86400 => format!("{} hours ago", secs / 3600),
        _ => format!("{} days ago", secs / 86400),
    }
}
