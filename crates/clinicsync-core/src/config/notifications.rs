//! Notification log configuration.

use serde::{Deserialize, Serialize};

/// Settings for the persisted notification log and its toasts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// Key the notification log is persisted under.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    /// Maximum number of records kept; older ones are truncated.
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    /// How long a toast stays on screen, in milliseconds.
    #[serde(default = "default_toast_lifetime")]
    pub toast_lifetime_ms: u64,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            capacity: default_capacity(),
            toast_lifetime_ms: default_toast_lifetime(),
        }
    }
}

fn default_storage_key() -> String {
    "skincare_notifications".to_string()
}

fn default_capacity() -> usize {
    50
}

fn default_toast_lifetime() -> u64 {
    5000
}
