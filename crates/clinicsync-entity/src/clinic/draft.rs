//! Clinic create/update payload.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::status::ClinicStatus;

/// Fields the admin panel submits when creating or updating a clinic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ClinicDraft {
    /// Display name.
    #[validate(length(min = 1, max = 200, message = "name must not be empty"))]
    pub name: String,
    /// Free-text description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Street address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// City.
    #[validate(length(min = 1, message = "city must not be empty"))]
    pub city: String,
    /// Postal code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_code: Option<String>,
    /// Contact phone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Contact email.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email)]
    pub email: Option<String>,
    /// Opening hours.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opening_hours: Option<String>,
    /// Publication status.
    pub status: ClinicStatus,
    /// Headline treatment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popular_treatment: Option<String>,
    /// Price band.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_range: Option<String>,
    /// Card image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Rating out of five.
    #[validate(range(min = 0.0, max = 5.0))]
    pub rating: f64,
}

impl ClinicDraft {
    /// Rating used when the form leaves it blank.
    pub const DEFAULT_RATING: f64 = 4.5;

    /// Create a draft with only the required fields.
    pub fn new(name: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            address: None,
            city: city.into(),
            post_code: None,
            phone: None,
            email: None,
            opening_hours: None,
            status: ClinicStatus::Active,
            popular_treatment: None,
            price_range: None,
            image_url: None,
            rating: Self::DEFAULT_RATING,
        }
    }

    /// Check the draft, flattening validator output into one message.
    pub fn check(&self) -> Result<(), clinicsync_core::AppError> {
        self.validate()
            .map_err(|e| clinicsync_core::AppError::validation(format!("Invalid clinic: {e}")))
    }
}
