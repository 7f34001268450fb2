//! ClinicSync session host
//!
//! Runs one public page of a session: a notification log and a catalog
//! sync agent attached to the shared register, until Ctrl-C.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use clinicsync_catalog::HttpCatalogClient;
use clinicsync_core::config::AppConfig;
use clinicsync_core::error::AppError;
use clinicsync_core::traits::kv_store::KeyValueStore;
use clinicsync_realtime::bus::spawn_external_poller;
use clinicsync_realtime::{LogSurface, PersistentKeyValueBus, SessionContext, SessionSurfaces};
use clinicsync_storage::StoreManager;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Session error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let config_path =
        std::env::var("CLINICSYNC_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());
    AppConfig::load(&config_path)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Open the session and wait for Ctrl-C
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting ClinicSync session v{}", env!("CARGO_PKG_VERSION"));

    let store = StoreManager::new(&config.storage).await?;
    if !store.health_check().await? {
        return Err(AppError::persistence(format!(
            "Store '{}' is not usable",
            config.storage.root
        )));
    }
    let bus = PersistentKeyValueBus::new(store.provider(), config.bus.clone());

    let client = Arc::new(HttpCatalogClient::new(&config.catalog)?);
    tracing::info!("Catalog API at {}", client.base_url());

    let surface = Arc::new(LogSurface);
    let session = SessionContext::open(
        &bus,
        &config,
        client,
        SessionSurfaces {
            notifications: surface.clone(),
            catalog: Some(surface),
        },
    )
    .await;

    if let Some(interval) = config.bus.external_poll_interval() {
        let keys = vec![
            config.bus.key.clone(),
            config.notifications.storage_key.clone(),
        ];
        session.track(spawn_external_poller(
            Arc::clone(&bus),
            keys,
            interval,
            session.shutdown_receiver(),
        ));
    }

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| AppError::internal(format!("Failed to listen for Ctrl-C: {e}")))?;

    session.shutdown().await?;
    tracing::info!("Session closed");
    Ok(())
}
