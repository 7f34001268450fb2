//! Application configuration schemas.
//!
//! All configuration structs are deserialized from an optional TOML file
//! via the `config` crate, with `CLINICSYNC__` environment overrides. Every
//! section defaults, so an empty configuration is valid.

pub mod bus;
pub mod catalog;
pub mod logging;
pub mod notifications;
pub mod storage;
pub mod sync;

use serde::{Deserialize, Serialize};

pub use self::bus::BusConfig;
pub use self::catalog::CatalogConfig;
pub use self::logging::LoggingConfig;
pub use self::notifications::NotificationsConfig;
pub use self::storage::StorageConfig;
pub use self::sync::SyncConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Key/value store settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Notification log settings.
    #[serde(default)]
    pub notifications: NotificationsConfig,
    /// Cross-context bus settings.
    #[serde(default)]
    pub bus: BusConfig,
    /// Catalog sync agent settings.
    #[serde(default)]
    pub sync: SyncConfig,
    /// Remote catalog API settings.
    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file (optional) and the environment.
    ///
    /// Environment variables use the `CLINICSYNC__SECTION__FIELD` form,
    /// e.g. `CLINICSYNC__SYNC__REFRESH_INTERVAL_SECONDS=60`.
    pub fn load(path: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("CLINICSYNC")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let parsed: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        parsed.validate()?;
        Ok(parsed)
    }

    /// Reject settings that would make the subsystem misbehave.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.notifications.capacity == 0 {
            return Err(AppError::configuration(
                "notifications.capacity must be at least 1",
            ));
        }
        if self.bus.key.is_empty() || self.bus.topic.is_empty() {
            return Err(AppError::configuration(
                "bus.key and bus.topic must not be empty",
            ));
        }
        if self.bus.key == self.notifications.storage_key {
            return Err(AppError::configuration(
                "bus.key must differ from notifications.storage_key",
            ));
        }
        match self.storage.provider.as_str() {
            "memory" | "local" => Ok(()),
            other => Err(AppError::configuration(format!(
                "Unknown storage provider: '{other}'. Supported: memory, local"
            ))),
        }
    }
}
