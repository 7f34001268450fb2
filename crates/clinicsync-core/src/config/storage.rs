//! Key/value store configuration.

use serde::{Deserialize, Serialize};

/// Backing store for the session key/value register.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Store provider type: `"memory"` or `"local"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Root directory for the `"local"` provider.
    #[serde(default = "default_root")]
    pub root: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            root: default_root(),
        }
    }
}

fn default_provider() -> String {
    "local".to_string()
}

fn default_root() -> String {
    "data/session".to_string()
}
