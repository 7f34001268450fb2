//! Canned notifications for common domain events.

use clinicsync_entity::notification::NotificationKind;

/// A notification ready to be added to the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedNotification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
}

impl FormattedNotification {
    fn new(kind: NotificationKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Formats notifications for common events.
pub struct NotificationFormatter;

impl NotificationFormatter {
    /// An appointment was booked.
    pub fn booking_confirmed(date: &str, time: &str) -> FormattedNotification {
        FormattedNotification::new(
            NotificationKind::Booking,
            "Appointment Confirmed!",
            format!("Your skincare consultation is scheduled for {date} at {time}"),
        )
    }

    /// A skin test finished.
    pub fn test_complete(test_type: &str) -> FormattedNotification {
        FormattedNotification::new(
            NotificationKind::Update,
            format!("{test_type} Complete!"),
            "Your personalized results and recommendations are ready to view",
        )
    }

    pub fn profile_updated() -> FormattedNotification {
        FormattedNotification::new(
            NotificationKind::Success,
            "Profile Updated",
            "Your profile information has been successfully saved",
        )
    }

    pub fn skincare_reminder() -> FormattedNotification {
        FormattedNotification::new(
            NotificationKind::Reminder,
            "Skincare Reminder",
            "Don't forget your evening skincare routine!",
        )
    }

    /// A clinic added treatments.
    pub fn clinic_update(clinic_name: &str) -> FormattedNotification {
        FormattedNotification::new(
            NotificationKind::ClinicUpdate,
            "New Services Available",
            format!("{clinic_name} has added new treatments. Check them out!"),
        )
    }

    pub fn error(message: &str) -> FormattedNotification {
        FormattedNotification::new(NotificationKind::Error, "Something went wrong", message)
    }

    pub fn success(message: &str) -> FormattedNotification {
        FormattedNotification::new(NotificationKind::Success, "Success!", message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_confirmed() {
        let n = NotificationFormatter::booking_confirmed("2024-01-15", "10:00 AM");
        assert_eq!(n.kind, NotificationKind::Booking);
        assert_eq!(n.title, "Appointment Confirmed!");
        assert!(n.message.ends_with("2024-01-15 at 10:00 AM"));
    }

    #[test]
    fn test_kinds() {
        assert_eq!(NotificationFormatter::test_complete("Skin Test").title, "Skin Test Complete!");
        assert_eq!(NotificationFormatter::clinic_update("Glow").kind, NotificationKind::ClinicUpdate);
        assert_eq!(NotificationFormatter::error("boom").kind, NotificationKind::Error);
        assert_eq!(NotificationFormatter::skincare_reminder().kind, NotificationKind::Reminder);
    }
}
