//! Clinic status enumeration.

use serde::{Deserialize, Serialize};

/// Publication status of a clinic.
///
/// The admin panel offers `active`, `inactive` and `maintenance`; any other
/// string coming back from the API is kept verbatim rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ClinicStatus {
    /// Listed on the public pages.
    Active,
    /// Hidden from the public pages.
    Inactive,
    /// Temporarily closed.
    Maintenance,
    /// Any status this build does not know about.
    Other(String),
}

impl ClinicStatus {
    /// Return the status as its wire string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Maintenance => "maintenance",
            Self::Other(s) => s,
        }
    }
}

impl Default for ClinicStatus {
    fn default() -> Self {
        Self::Active
    }
}

impl From<String> for ClinicStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "active" => Self::Active,
            "inactive" => Self::Inactive,
            "maintenance" => Self::Maintenance,
            _ => Self::Other(s),
        }
    }
}

impl From<ClinicStatus> for String {
    fn from(status: ClinicStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for ClinicStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_and_unknown() {
        let known: ClinicStatus = serde_json::from_str("\"maintenance\"").expect("parse");
        assert_eq!(known, ClinicStatus::Maintenance);
        let other: ClinicStatus = serde_json::from_str("\"archived\"").expect("parse");
        assert_eq!(other, ClinicStatus::Other("archived".to_string()));
        assert_eq!(serde_json::to_string(&other).expect("serialize"), "\"archived\"");
    }
}
