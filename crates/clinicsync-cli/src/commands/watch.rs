//! Run a public page in the terminal.

use std::sync::Arc;

use clap::Args;
use serde::Serialize;
use tabled::Tabled;
use tracing::info;

use clinicsync_catalog::view::{CatalogView, ClinicCard};
use clinicsync_core::error::AppError;
use clinicsync_realtime::bus::spawn_external_poller;
use clinicsync_realtime::notification::{BadgeView, NotificationListView, ToastId, ToastView};
use clinicsync_realtime::surface::NoticeLevel;
use clinicsync_realtime::{CatalogSurface, Notice, NotificationSurface};

use crate::output::{self, OutputFormat};

/// Arguments for the watch command
#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Also print the notification list whenever it changes
    #[arg(long)]
    pub notifications: bool,
}

/// Card display row for table output
#[derive(Debug, Serialize, Tabled)]
struct CardRow {
    name: String,
    city: String,
    treatment: String,
    price: String,
    rating: String,
    hours: String,
    link: String,
}

impl From<&ClinicCard> for CardRow {
    fn from(c: &ClinicCard) -> Self {
        Self {
            name: c.name.clone(),
            city: c.city.clone(),
            treatment: c.popular_treatment.clone(),
            price: c.price_range.clone(),
            rating: format!("{} ({})", c.stars, c.rating),
            hours: c.opening_hours.clone(),
            link: c.detail_link.clone(),
        }
    }
}

/// Prints renders to stdout.
#[derive(Debug)]
struct PrintSurface {
    format: OutputFormat,
    notifications: bool,
}

impl CatalogSurface for PrintSurface {
    fn render_catalog(&self, view: &CatalogView) {
        println!("Clinics ({} of {} shown)", view.cards.len(), view.total);
        let rows: Vec<CardRow> = view.cards.iter().map(CardRow::from).collect();
        output::print_list(&rows, self.format);
    }

    fn show_notice(&self, notice: &Notice) {
        match notice.level {
            NoticeLevel::Info => output::print_success(&notice.message),
            NoticeLevel::Error => output::print_warning(&notice.message),
        }
    }
}

impl NotificationSurface for PrintSurface {
    fn render_list(&self, view: &NotificationListView) {
        if !self.notifications {
            return;
        }
        if view.empty {
            println!("No notifications yet");
            return;
        }
        for item in &view.items {
            let marker = if item.unread { "●" } else { " " };
            println!(
                "{marker} {} {} ({}): {}",
                item.icon, item.title, item.time_ago, item.message
            );
        }
    }

    fn render_badge(&self, badge: &BadgeView) {
        if self.notifications && badge.visible {
            output::print_kv("Unread", &badge.count.to_string());
        }
    }

    fn show_toast(&self, toast: &ToastView) {
        println!("{} {}: {}", toast.icon, toast.title, toast.message);
    }

    fn dismiss_toast(&self, _id: ToastId) {}
}

/// Execute the watch command
pub async fn execute(args: &WatchArgs, config_path: &str, format: OutputFormat) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let bus = super::open_bus(&config).await?;

    let surface = Arc::new(PrintSurface {
        format,
        notifications: args.notifications,
    });
    let session = super::open_session(&config, &bus, surface.clone(), Some(surface)).await?;

    if let Some(interval) = config.bus.external_poll_interval() {
        let keys = vec![config.bus.key.clone(), config.notifications.storage_key.clone()];
        session.track(spawn_external_poller(
            Arc::clone(&bus),
            keys,
            interval,
            session.shutdown_receiver(),
        ));
    } else {
        output::print_warning("bus.external_poll_ms is 0; edits from other processes will only show on the timer");
    }

    info!("Watching catalog, press Ctrl-C to stop");
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| AppError::internal(format!("Failed to listen for Ctrl-C: {e}")))?;

    session.shutdown().await
}
