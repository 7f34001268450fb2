//! Notification domain entities.

pub mod kind;
pub mod record;

pub use kind::NotificationKind;
pub use record::NotificationRecord;
