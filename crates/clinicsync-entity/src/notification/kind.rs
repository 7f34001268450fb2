//! Notification kind enumeration.

use serde::{Deserialize, Serialize};

/// What a notification is about. Persisted as the record's `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationKind {
    /// An appointment was booked or changed.
    Booking,
    /// A scheduled reminder.
    Reminder,
    /// Results or content were updated.
    Update,
    /// Clinic catalog information changed.
    ClinicUpdate,
    /// An action completed successfully.
    Success,
    /// Something needs attention.
    Warning,
    /// An action failed.
    Error,
    /// General information. Unrecognized kinds read back as this.
    #[serde(other)]
    Info,
}

impl NotificationKind {
    /// Every kind, in display order.
    pub const ALL: [Self; 8] = [
        Self::Booking,
        Self::Reminder,
        Self::Update,
        Self::ClinicUpdate,
        Self::Success,
        Self::Warning,
        Self::Error,
        Self::Info,
    ];

    /// Return the kind as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Booking => "booking",
            Self::Reminder => "reminder",
            Self::Update => "update",
            Self::ClinicUpdate => "clinic-update",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Info => "info",
        }
    }

    /// Parse a wire string.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == s)
    }

    /// Icon shown next to the notification.
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Booking => "📅",
            Self::Reminder => "⏰",
            Self::Update => "📝",
            Self::ClinicUpdate => "🏥",
            Self::Success => "✅",
            Self::Warning => "⚠️",
            Self::Error => "❌",
            Self::Info => "ℹ️",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_match_serde() {
        for kind in NotificationKind::ALL {
            let json = serde_json::to_string(&kind).expect("serialize");
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
            assert_eq!(NotificationKind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(NotificationKind::parse("bogus"), None);
    }

    #[test]
    fn test_unknown_kind_reads_as_info() {
        let kind: NotificationKind = serde_json::from_str("\"promo\"").expect("deserialize");
        assert_eq!(kind, NotificationKind::Info);
    }
}
