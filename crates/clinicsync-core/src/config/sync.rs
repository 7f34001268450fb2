//! Catalog sync agent configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings for the catalog sync agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Period of the fallback refresh timer, in seconds.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_seconds: u64,
    /// Clinic statuses that are rendered; everything else is filtered out.
    #[serde(default = "default_visible_statuses")]
    pub visible_statuses: Vec<String>,
}

impl SyncConfig {
    /// The fallback refresh period.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_seconds.max(1))
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            refresh_interval_seconds: default_refresh_interval(),
            visible_statuses: default_visible_statuses(),
        }
    }
}

fn default_refresh_interval() -> u64 {
    300
}

fn default_visible_statuses() -> Vec<String> {
    vec!["active".to_string()]
}
