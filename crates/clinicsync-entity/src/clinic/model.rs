//! Clinic entity model.

use serde::{Deserialize, Deserializer, Serialize};

use super::status::ClinicStatus;

/// Identifier assigned by the catalog API.
///
/// The API has served both numeric and string ids, so either is accepted
/// and kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ClinicId(pub String);

impl ClinicId {
    /// Create an id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for ClinicId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(i64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Self(s),
            Raw::Number(n) => Self(n.to_string()),
        })
    }
}

impl std::fmt::Display for ClinicId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A clinic as served by the catalog API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clinic {
    /// Catalog identifier.
    pub id: ClinicId,
    /// Display name.
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Street address.
    #[serde(default)]
    pub address: Option<String>,
    /// City shown on the card.
    #[serde(default)]
    pub city: Option<String>,
    /// Postal code.
    #[serde(default)]
    pub post_code: Option<String>,
    /// Contact phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,
    /// Opening hours, free text.
    #[serde(default)]
    pub opening_hours: Option<String>,
    /// Publication status.
    #[serde(default)]
    pub status: ClinicStatus,
    /// Card image.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Headline treatment.
    #[serde(default)]
    pub popular_treatment: Option<String>,
    /// Price band such as `$$`.
    #[serde(default)]
    pub price_range: Option<String>,
    /// Average rating out of five.
    #[serde(default)]
    pub rating: Option<f64>,
}

impl Clinic {
    /// Create a clinic with only the required fields set.
    pub fn new(id: impl Into<String>, name: impl Into<String>, status: ClinicStatus) -> Self {
        Self {
            id: ClinicId::new(id),
            name: name.into(),
            description: None,
            address: None,
            city: None,
            post_code: None,
            phone: None,
            email: None,
            opening_hours: None,
            status,
            image_url: None,
            popular_treatment: None,
            price_range: None,
            rating: None,
        }
    }
}
