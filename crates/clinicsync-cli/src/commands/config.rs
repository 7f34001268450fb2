//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use clinicsync_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,
    /// Validate configuration file
    Validate,
}

/// Execute config commands
pub fn execute(args: &ConfigArgs, config_path: &str, format: OutputFormat) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            let config = super::load_config(config_path)?;
            output::print_item(&config, format);
        }
        ConfigCommand::Validate => match super::load_config(config_path) {
            Ok(config) => {
                output::print_success(&format!("Configuration '{config_path}' is valid"));
                output::print_kv("Storage", &format!("{} ({})", config.storage.provider, config.storage.root));
                output::print_kv("Notification key", &config.notifications.storage_key);
                output::print_kv("Capacity", &config.notifications.capacity.to_string());
                output::print_kv("Bus", &format!("{} / {}", config.bus.key, config.bus.topic));
                output::print_kv(
                    "Refresh interval",
                    &format!("{}s", config.sync.refresh_interval().as_secs()),
                );
                output::print_kv("Catalog API", &config.catalog.base_url);
            }
            Err(e) => {
                output::print_error(&format!("Configuration invalid: {e}"));
                return Err(e);
            }
        },
    }

    Ok(())
}
