//! Slug derivation command.

use clap::Args;

use clinicsync_core::error::AppError;
use clinicsync_core::types::slugify;

use crate::output::{self, OutputFormat};

/// Arguments for the slug command
#[derive(Debug, Args)]
pub struct SlugArgs {
    /// Clinic name; several words are joined with spaces
    #[arg(required = true)]
    pub name: Vec<String>,
}

/// Execute the slug command
pub fn execute(args: &SlugArgs, format: OutputFormat) -> Result<(), AppError> {
    let name = args.name.join(" ");
    let slug = slugify(&name);
    match format {
        OutputFormat::Table => println!("{slug}"),
        OutputFormat::Json => {
            output::print_item(&serde_json::json!({ "name": name, "slug": slug }), format)
        }
    }
    Ok(())
}
