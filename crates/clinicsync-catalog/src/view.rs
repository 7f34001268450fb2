//! Derivation of the rendered catalog from a snapshot.
//!
//! The view is a pure function of the clinics and the visible statuses, so
//! rendering the same snapshot twice yields an identical view.

use serde::Serialize;

use clinicsync_core::types::slugify;
use clinicsync_entity::clinic::{Clinic, ClinicId};

/// Rating shown when the clinic has none.
pub const DEFAULT_RATING: f64 = 4.5;
/// Treatment shown when the clinic has none.
pub const DEFAULT_TREATMENT: &str = "Acne Removal";
/// Price band shown when the clinic has none.
pub const DEFAULT_PRICE_RANGE: &str = "$$";
/// Hours shown when the clinic has none.
pub const DEFAULT_HOURS: &str = "Contact for hours";

/// One clinic card on a public page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClinicCard {
    /// Catalog id.
    pub id: ClinicId,
    /// Display name.
    pub name: String,
    /// City, empty when unknown.
    pub city: String,
    /// Headline treatment.
    pub popular_treatment: String,
    /// Price band.
    pub price_range: String,
    /// Numeric rating.
    pub rating: f64,
    /// Five-character star string for the rating.
    pub stars: String,
    /// Opening hours.
    pub opening_hours: String,
    /// Contact phone, empty when unknown.
    pub phone: String,
    /// Card image, if any.
    pub image_url: Option<String>,
    /// Link to the detail page.
    pub detail_link: String,
}

impl ClinicCard {
    /// Build the card for one clinic.
    pub fn from_clinic(clinic: &Clinic) -> Self {
        // Unrated clinics arrive as 0.0.
        let rating = clinic
            .rating
            .filter(|r| *r > 0.0)
            .unwrap_or(DEFAULT_RATING);
        Self {
            id: clinic.id.clone(),
            name: clinic.name.clone(),
            city: clinic.city.clone().unwrap_or_default(),
            popular_treatment: text_or(&clinic.popular_treatment, DEFAULT_TREATMENT),
            price_range: text_or(&clinic.price_range, DEFAULT_PRICE_RANGE),
            rating,
            stars: stars(rating),
            opening_hours: text_or(&clinic.opening_hours, DEFAULT_HOURS),
            phone: clinic.phone.clone().unwrap_or_default(),
            image_url: clinic.image_url.clone(),
            detail_link: detail_link(clinic),
        }
    }
}

/// The field's text, or `default` when it is missing or empty.
fn text_or(field: &Option<String>, default: &str) -> String {
    field
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or(default)
        .to_string()
}

/// The rendered catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogView {
    /// Visible clinics in catalog order.
    pub cards: Vec<ClinicCard>,
    /// How many clinics the snapshot held before filtering.
    pub total: usize,
}

impl CatalogView {
    /// Keep the clinics whose status is listed in `visible_statuses` and
    /// build their cards.
    pub fn derive(clinics: &[Clinic], visible_statuses: &[String]) -> Self {
        let cards = clinics
            .iter()
            .filter(|c| visible_statuses.iter().any(|s| s == c.status.as_str()))
            .map(ClinicCard::from_clinic)
            .collect();
        Self {
            cards,
            total: clinics.len(),
        }
    }

    /// Whether no card is visible.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Five-character star string: `★` per whole point, `☆` for the rest.
pub fn stars(rating: f64) -> String {
    let full = rating.clamp(0.0, 5.0).floor() as usize;
    format!("{}{}", "★".repeat(full), "☆".repeat(5 - full))
}

/// Link to a clinic's detail page, carrying both slug and id.
pub fn detail_link(clinic: &Clinic) -> String {
    format!(
        "clinic-details.html?clinic={}&id={}",
        slugify(&clinic.name),
        clinic.id
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinicsync_entity::clinic::ClinicStatus;

    fn clinic(id: &str, name: &str, status: ClinicStatus) -> Clinic {
        Clinic::new(id, name, status)
    }

    #[test]
    fn test_only_active_rendered() {
        let clinics = vec![
            clinic("1", "Glow", ClinicStatus::Active),
            clinic("2", "Closed", ClinicStatus::Maintenance),
            clinic("3", "Radiance", ClinicStatus::Active),
        ];
        let view = CatalogView::derive(&clinics, &["active".to_string()]);
        assert_eq!(view.total, 3);
        let names: Vec<_> = view.cards.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Glow", "Radiance"]);
    }

    #[test]
    fn test_card_defaults() {
        let card = ClinicCard::from_clinic(&clinic("9", "Elite Dermatology!", ClinicStatus::Active));
        assert_eq!(card.rating, 4.5);
        assert_eq!(card.stars, "★★★★☆");
        assert_eq!(card.popular_treatment, "Acne Removal");
        assert_eq!(card.price_range, "$$");
        assert_eq!(card.opening_hours, "Contact for hours");
        assert_eq!(
            card.detail_link,
            "clinic-details.html?clinic=elite-dermatology&id=9"
        );
    }

    #[test]
    fn test_zero_and_empty_fields_use_defaults() {
        let clinic: Clinic = serde_json::from_str(
            r#"{"id": 1, "name": "Glow", "status": "active", "rating": 0.0,
                "popularTreatment": "", "priceRange": "", "openingHours": ""}"#,
        )
        .unwrap();
        let card = ClinicCard::from_clinic(&clinic);
        assert_eq!(card.rating, 4.5);
        assert_eq!(card.stars, "★★★★☆");
        assert_eq!(card.popular_treatment, "Acne Removal");
        assert_eq!(card.price_range, "$$");
        assert_eq!(card.opening_hours, "Contact for hours");
    }

    #[test]
    fn test_stars_clamped() {
        assert_eq!(stars(0.0), "☆☆☆☆☆");
        assert_eq!(stars(5.0), "★★★★★");
        assert_eq!(stars(9.0), "★★★★★");
        assert_eq!(stars(-1.0), "☆☆☆☆☆");
    }

    #[test]
    fn test_derive_is_deterministic() {
        let clinics = vec![clinic("1", "Glow", ClinicStatus::Active)];
        let statuses = vec!["active".to_string()];
        assert_eq!(
            CatalogView::derive(&clinics, &statuses),
            CatalogView::derive(&clinics, &statuses)
        );
    }
}
