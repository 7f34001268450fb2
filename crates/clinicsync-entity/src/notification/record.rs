//! Notification record model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use clinicsync_core::types::NotificationId;

use super::kind::NotificationKind;

/// One entry of the persisted notification log.
///
/// Serialized as `{id, type, title, message, timestamp, read}` with an
/// RFC 3339 timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRecord {
    /// Unique notification identifier.
    pub id: NotificationId,
    /// What the notification is about.
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub message: String,
    /// When the notification was created.
    pub timestamp: DateTime<Utc>,
    /// Whether the user has read this notification.
    pub read: bool,
}

impl NotificationRecord {
    /// Create a fresh, unread record stamped with the current time.
    pub fn new(kind: NotificationKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: NotificationId::new(),
            kind,
            title: title.into(),
            message: message.into(),
            timestamp: Utc::now(),
            read: false,
        }
    }

    /// Check if the notification has not been read yet.
    pub fn is_unread(&self) -> bool {
        !self.read
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_unread() {
        let record = NotificationRecord::new(NotificationKind::Info, "t", "m");
        assert!(record.is_unread());
    }

    #[test]
    fn test_wire_shape() {
        let record = NotificationRecord::new(NotificationKind::ClinicUpdate, "Title", "Body");
        let value = serde_json::to_value(&record).expect("serialize");
        let obj = value.as_object().expect("object");
        assert_eq!(obj.len(), 6);
        assert_eq!(obj["type"], "clinic-update");
        assert_eq!(obj["title"], "Title");
        assert_eq!(obj["read"], false);
        assert!(obj["timestamp"].as_str().is_some());
    }
}
