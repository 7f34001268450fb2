//! CLI command definitions and dispatch.

pub mod catalog;
pub mod config;
pub mod notify;
pub mod slug;
pub mod watch;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use clinicsync_catalog::HttpCatalogClient;
use clinicsync_core::config::AppConfig;
use clinicsync_core::error::AppError;
use clinicsync_realtime::notification::StoreOutcome;
use clinicsync_realtime::{
    CatalogSurface, LogSurface, NotificationSurface, PersistentKeyValueBus, SessionContext,
    SessionSurfaces,
};
use clinicsync_storage::StoreManager;

use crate::output::{self, OutputFormat};

/// ClinicSync: notification log and catalog sync for the clinic booking front end
#[derive(Debug, Parser)]
#[command(name = "clinicsync", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Notification log
    Notify(notify::NotifyArgs),
    /// Derive a URL slug from a clinic name
    Slug(slug::SlugArgs),
    /// Clinic catalog administration
    Catalog(catalog::CatalogArgs),
    /// Run a public-page sync agent and print what it renders
    Watch(watch::WatchArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Notify(args) => notify::execute(args, &self.config, self.format).await,
            Commands::Slug(args) => slug::execute(args, self.format),
            Commands::Catalog(args) => catalog::execute(args, &self.config, self.format).await,
            Commands::Watch(args) => watch::execute(args, &self.config, self.format).await,
            Commands::Config(args) => config::execute(args, &self.config, self.format),
        }
    }
}

/// Helper: load configuration from file
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(config_path)
}

/// Helper: open the shared register and the bus over it
pub async fn open_bus(config: &AppConfig) -> Result<Arc<PersistentKeyValueBus>, AppError> {
    let store = StoreManager::new(&config.storage).await?;
    Ok(PersistentKeyValueBus::new(
        store.provider(),
        config.bus.clone(),
    ))
}

/// Helper: open a session context as one more page of the session
pub async fn open_session(
    config: &AppConfig,
    bus: &Arc<PersistentKeyValueBus>,
    notifications: Arc<dyn NotificationSurface>,
    catalog: Option<Arc<dyn CatalogSurface>>,
) -> Result<SessionContext, AppError> {
    let client = Arc::new(HttpCatalogClient::new(&config.catalog)?);
    Ok(SessionContext::open(
        bus,
        config,
        client,
        SessionSurfaces {
            notifications,
            catalog,
        },
    )
    .await)
}

/// Helper: a session without a clinic grid, rendering into the log
pub async fn open_quiet_session(
    config: &AppConfig,
) -> Result<(Arc<PersistentKeyValueBus>, SessionContext), AppError> {
    let bus = open_bus(config).await?;
    let session = open_session(config, &bus, Arc::new(LogSurface), None).await?;
    Ok((bus, session))
}

/// Helper: report a degraded store outcome and unwrap its value
pub fn report<T>(outcome: StoreOutcome<T>) -> T {
    if let clinicsync_realtime::notification::Durability::Degraded { reason } = &outcome.durability
    {
        output::print_warning(&format!("Notification log not persisted: {reason}"));
    }
    outcome.into_value()
}
