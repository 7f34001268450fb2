//! Notification log CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use clinicsync_core::error::AppError;
use clinicsync_core::types::NotificationId;
use clinicsync_entity::notification::{NotificationKind, NotificationRecord};
use clinicsync_realtime::notification::NotificationFormatter;
use clinicsync_realtime::notification::view::time_ago;

use super::report;
use crate::output::{self, OutputFormat};

/// Arguments for notify commands
#[derive(Debug, Args)]
pub struct NotifyArgs {
    /// Notify subcommand
    #[command(subcommand)]
    pub command: NotifyCommand,
}

/// Notify subcommands
#[derive(Debug, Subcommand)]
pub enum NotifyCommand {
    /// Append a notification
    Add {
        /// booking, reminder, update, clinic-update, success, warning, error or info
        kind: String,
        /// Title
        title: String,
        /// Message
        message: String,
    },
    /// Append a booking confirmation
    Booking {
        /// Appointment date
        date: String,
        /// Appointment time
        time: String,
    },
    /// List notifications, newest first
    List,
    /// Mark a notification read
    Read {
        /// Notification ID
        id: String,
    },
    /// Remove every notification
    Clear,
    /// Print the unread count
    Unread,
}

/// Notification display row for table output
#[derive(Debug, Serialize, Tabled)]
struct NotificationRow {
    id: String,
    #[tabled(rename = "type")]
    #[serde(rename = "type")]
    kind: String,
    title: String,
    message: String,
    when: String,
    read: bool,
}

impl From<&NotificationRecord> for NotificationRow {
    fn from(r: &NotificationRecord) -> Self {
        Self {
            id: r.id.to_string(),
            kind: format!("{} {}", r.kind.icon(), r.kind),
            title: r.title.clone(),
            message: r.message.clone(),
            when: time_ago(r.timestamp, chrono::Utc::now()),
            read: r.read,
        }
    }
}

/// Execute notify commands
pub async fn execute(
    args: &NotifyArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let (_bus, session) = super::open_quiet_session(&config).await?;
    let store = &session.notifications;

    match &args.command {
        NotifyCommand::Add {
            kind,
            title,
            message,
        } => {
            let kind = NotificationKind::parse(kind)
                .ok_or_else(|| AppError::validation(format!("Unknown notification type '{kind}'")))?;
            let record = report(store.add(kind, title.as_str(), message.as_str()).await);
            output::print_success(&format!("Notification {} added", record.id));
        }
        NotifyCommand::Booking { date, time } => {
            let record = report(
                store
                    .add_formatted(NotificationFormatter::booking_confirmed(date, time))
                    .await,
            );
            output::print_success(&format!("Notification {} added", record.id));
        }
        NotifyCommand::List => {
            let records = report(store.list().await);
            let rows: Vec<NotificationRow> = records.iter().map(NotificationRow::from).collect();
            output::print_list(&rows, format);
        }
        NotifyCommand::Read { id } => {
            let id: NotificationId = id
                .parse()
                .map_err(|e| AppError::validation(format!("Invalid notification id '{id}': {e}")))?;
            if report(store.mark_read(id).await) {
                output::print_success(&format!("Notification {id} marked read"));
            } else {
                output::print_warning(&format!("Notification {id} not found or already read"));
            }
        }
        NotifyCommand::Clear => {
            report(store.clear_all().await);
            output::print_success("All notifications cleared");
        }
        NotifyCommand::Unread => {
            let count = report(store.unread_count().await);
            match format {
                OutputFormat::Table => println!("Unread notifications: {count}"),
                OutputFormat::Json => output::print_item(&serde_json::json!({ "unread": count }), format),
            }
        }
    }

    session.shutdown().await
}
