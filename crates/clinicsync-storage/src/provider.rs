//! Store manager that dispatches to the configured provider.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use clinicsync_core::config::StorageConfig;
use clinicsync_core::error::AppError;
use clinicsync_core::result::AppResult;
use clinicsync_core::traits::kv_store::KeyValueStore;

/// Key/value store wrapping the configured provider.
///
/// The provider is selected at construction time based on configuration.
#[derive(Debug, Clone)]
pub struct StoreManager {
    /// The inner store provider.
    inner: Arc<dyn KeyValueStore>,
}

impl StoreManager {
    /// Create a new store manager from configuration.
    pub async fn new(config: &StorageConfig) -> AppResult<Self> {
        let inner: Arc<dyn KeyValueStore> = match config.provider.as_str() {
            #[cfg(feature = "local")]
            "local" => {
                info!(root = %config.root, "Initializing local key/value store");
                Arc::new(crate::local::LocalKeyValueStore::new(&config.root).await?)
            }
            #[cfg(feature = "memory")]
            "memory" => {
                info!("Initializing in-memory key/value store");
                Arc::new(crate::memory::MemoryKeyValueStore::new())
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown storage provider: '{other}'. Supported: memory, local"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Create a store manager from an existing provider (for testing).
    pub fn from_provider(provider: Arc<dyn KeyValueStore>) -> Self {
        Self { inner: provider }
    }

    /// Get a shared handle to the inner provider.
    pub fn provider(&self) -> Arc<dyn KeyValueStore> {
        Arc::clone(&self.inner)
    }
}

#[async_trait]
impl KeyValueStore for StoreManager {
    fn provider_type(&self) -> &str {
        self.inner.provider_type()
    }

    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        self.inner.remove(key).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_provider() {
        let config = StorageConfig {
            provider: "memory".to_string(),
            root: String::new(),
        };
        let manager = StoreManager::new(&config).await.unwrap();
        assert_eq!(manager.provider_type(), "memory");
        manager.set("k", "v").await.unwrap();
        assert_eq!(manager.get("k").await.unwrap().as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn test_local_provider() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            provider: "local".to_string(),
            root: dir.path().to_string_lossy().into_owned(),
        };
        let manager = StoreManager::new(&config).await.unwrap();
        assert_eq!(manager.provider_type(), "local");
        assert!(manager.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_provider() {
        let config = StorageConfig {
            provider: "redis".to_string(),
            root: String::new(),
        };
        assert!(StoreManager::new(&config).await.is_err());
    }
}
