//! Cross-context bus configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings for the persistent key/value bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusConfig {
    /// Well-known key every bus event is written under.
    #[serde(default = "default_key")]
    pub key: String,
    /// Topic used for catalog invalidations.
    #[serde(default = "default_topic")]
    pub topic: String,
    /// Interval for polling the backing store for writes made by other
    /// processes, in milliseconds. `0` disables polling.
    #[serde(default = "default_external_poll")]
    pub external_poll_ms: u64,
}

impl BusConfig {
    /// Cross-process polling period, `None` when disabled.
    pub fn external_poll_interval(&self) -> Option<Duration> {
        (self.external_poll_ms > 0).then(|| Duration::from_millis(self.external_poll_ms))
    }
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            key: default_key(),
            topic: default_topic(),
            external_poll_ms: default_external_poll(),
        }
    }
}

fn default_key() -> String {
    "admin_clinic_update".to_string()
}

fn default_topic() -> String {
    "catalog_update".to_string()
}

fn default_external_poll() -> u64 {
    1000
}
