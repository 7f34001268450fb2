//! Local filesystem key/value store.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use clinicsync_core::error::{AppError, ErrorKind};
use clinicsync_core::result::AppResult;
use clinicsync_core::traits::kv_store::KeyValueStore;

use crate::keys;

/// Stores each key as `<root>/<key>.json`.
///
/// Writes go to a temporary file that is renamed over the target, so a
/// reader never sees a half-written value.
#[derive(Debug, Clone)]
pub struct LocalKeyValueStore {
    /// Directory holding one file per key.
    root: PathBuf,
    /// Disambiguates temporary files of concurrent writers in this process.
    write_seq: Arc<AtomicU64>,
}

impl LocalKeyValueStore {
    /// Create a store rooted at the given directory, creating it if needed.
    pub async fn new(root_path: impl AsRef<Path>) -> AppResult<Self> {
        let root = root_path.as_ref().to_path_buf();
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Persistence,
                format!("Failed to create store root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self {
            root,
            write_seq: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Directory the store writes into.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    fn temp_path(&self, key: &str) -> PathBuf {
        let seq = self.write_seq.fetch_add(1, Ordering::Relaxed);
        self.root
            .join(format!(".{key}.{}.{seq}.tmp", std::process::id()))
    }
}

#[async_trait]
impl KeyValueStore for LocalKeyValueStore {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        keys::validate(key)?;
        match fs::read_to_string(self.resolve(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Persistence,
                format!("Failed to read key: {key}"),
                e,
            )),
        }
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        keys::validate(key)?;
        let target = self.resolve(key);
        let temp = self.temp_path(key);

        fs::write(&temp, value).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Persistence,
                format!("Failed to write key: {key}"),
                e,
            )
        })?;

        if let Err(e) = fs::rename(&temp, &target).await {
            let _ = fs::remove_file(&temp).await;
            return Err(AppError::with_source(
                ErrorKind::Persistence,
                format!("Failed to commit key: {key}"),
                e,
            ));
        }

        debug!(key, bytes = value.len(), "Wrote key");
        Ok(())
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        keys::validate(key)?;
        match fs::remove_file(self.resolve(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Persistence,
                format!("Failed to remove key: {key}"),
                e,
            )),
        }
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(self.root.exists() && self.root.is_dir())
    }
}
