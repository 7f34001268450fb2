//! Clinic catalog CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use clinicsync_catalog::{HttpCatalogClient, RemoteCatalogClient};
use clinicsync_core::error::AppError;
use clinicsync_entity::clinic::{Clinic, ClinicDraft, ClinicId, ClinicStatus};
use clinicsync_realtime::EditReport;

use crate::output::{self, OutputFormat};

/// Arguments for catalog commands
#[derive(Debug, Args)]
pub struct CatalogArgs {
    /// Catalog subcommand
    #[command(subcommand)]
    pub command: CatalogCommand,
}

/// Catalog subcommands
#[derive(Debug, Subcommand)]
pub enum CatalogCommand {
    /// List every clinic, whatever its status
    List,
    /// Create a clinic and notify open pages
    Create(ClinicFields),
    /// Update a clinic and notify open pages
    Update {
        /// Clinic ID
        id: String,
        #[command(flatten)]
        fields: ClinicFields,
    },
    /// Delete a clinic and notify open pages
    Delete {
        /// Clinic ID
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Clinic form fields
#[derive(Debug, Args)]
pub struct ClinicFields {
    /// Display name
    #[arg(long)]
    pub name: String,
    /// City
    #[arg(long)]
    pub city: String,
    /// Street address
    #[arg(long)]
    pub address: Option<String>,
    /// Postal code
    #[arg(long)]
    pub post_code: Option<String>,
    /// Contact phone
    #[arg(long)]
    pub phone: Option<String>,
    /// Contact email
    #[arg(long)]
    pub email: Option<String>,
    /// Opening hours
    #[arg(long)]
    pub hours: Option<String>,
    /// active, inactive or maintenance
    #[arg(long, default_value = "active")]
    pub status: String,
    /// Headline treatment
    #[arg(long)]
    pub treatment: Option<String>,
    /// Price band, e.g. $$
    #[arg(long)]
    pub price_range: Option<String>,
    /// Rating out of five
    #[arg(long, default_value_t = ClinicDraft::DEFAULT_RATING)]
    pub rating: f64,
    /// Description
    #[arg(long)]
    pub description: Option<String>,
    /// Card image URL
    #[arg(long)]
    pub image_url: Option<String>,
}

impl ClinicFields {
    fn to_draft(&self) -> ClinicDraft {
        ClinicDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            address: self.address.clone(),
            city: self.city.clone(),
            post_code: self.post_code.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            opening_hours: self.hours.clone(),
            status: ClinicStatus::from(self.status.clone()),
            popular_treatment: self.treatment.clone(),
            price_range: self.price_range.clone(),
            image_url: self.image_url.clone(),
            rating: self.rating,
        }
    }
}

/// Clinic display row for table output
#[derive(Debug, Serialize, Tabled)]
struct ClinicRow {
    id: String,
    name: String,
    city: String,
    status: String,
    rating: String,
    phone: String,
}

impl From<&Clinic> for ClinicRow {
    fn from(c: &Clinic) -> Self {
        Self {
            id: c.id.to_string(),
            name: c.name.clone(),
            city: c.city.clone().unwrap_or_default(),
            status: c.status.as_str().to_string(),
            rating: c.rating.map(|r| format!("{r:.1}")).unwrap_or_else(|| "-".to_string()),
            phone: c.phone.clone().unwrap_or_default(),
        }
    }
}

/// A committed change to the catalog.
enum Edit {
    Create(ClinicDraft),
    Update(ClinicId, ClinicDraft),
    Delete(ClinicId),
}

/// Execute catalog commands
pub async fn execute(
    args: &CatalogArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;

    let edit = match &args.command {
        CatalogCommand::List => {
            let client = HttpCatalogClient::new(&config.catalog)?;
            let clinics = client.list().await?;
            let rows: Vec<ClinicRow> = clinics.iter().map(ClinicRow::from).collect();
            output::print_list(&rows, format);
            return Ok(());
        }
        CatalogCommand::Create(fields) => Edit::Create(fields.to_draft()),
        CatalogCommand::Update { id, fields } => {
            Edit::Update(ClinicId::new(id.as_str()), fields.to_draft())
        }
        CatalogCommand::Delete { id, yes } => {
            if !yes {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(format!("Delete clinic '{id}'?"))
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

                if !confirm {
                    println!("Cancelled.");
                    return Ok(());
                }
            }
            Edit::Delete(ClinicId::new(id.as_str()))
        }
    };

    let (_bus, session) = super::open_quiet_session(&config).await?;
    let result = match &edit {
        Edit::Create(draft) => session.editor.create(draft).await,
        Edit::Update(id, draft) => session.editor.update(id, draft).await,
        Edit::Delete(id) => session.editor.delete(id).await,
    };
    session.shutdown().await?;

    let report: EditReport = result?;
    output::print_success(&format!(
        "Catalog updated; {} clinics, {} listeners notified",
        report.clinics.len(),
        report.delivered
    ));
    Ok(())
}
