//! JSON envelopes returned by the catalog API.

use serde::{Deserialize, Serialize};

use clinicsync_core::error::AppError;
use clinicsync_core::result::AppResult;
use clinicsync_entity::clinic::Clinic;

/// Answer to `GET /clinics`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse {
    /// Whether the request succeeded.
    pub success: bool,
    /// The clinics; older API versions call this field `clinics`.
    #[serde(default, alias = "clinics")]
    pub items: Option<Vec<Clinic>>,
    /// Failure reason when `success` is false.
    #[serde(default)]
    pub error: Option<String>,
}

impl ListResponse {
    /// Convert the envelope into the clinics or a backend error.
    pub fn into_result(self) -> AppResult<Vec<Clinic>> {
        if self.success {
            Ok(self.items.unwrap_or_default())
        } else {
            Err(AppError::backend(
                self.error.unwrap_or_else(|| "unknown error".to_string()),
            ))
        }
    }
}

/// Answer to create, update and delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckResponse {
    /// Whether the request succeeded.
    pub success: bool,
    /// Failure reason when `success` is false.
    #[serde(default)]
    pub error: Option<String>,
}

impl AckResponse {
    /// Convert the envelope into `()` or a backend error.
    pub fn into_result(self) -> AppResult<()> {
        if self.success {
            Ok(())
        } else {
            Err(AppError::backend(
                self.error.unwrap_or_else(|| "unknown error".to_string()),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinicsync_core::error::ErrorKind;

    #[test]
    fn test_items_and_legacy_alias() {
        let current: ListResponse =
            serde_json::from_str(r#"{"success": true, "items": [{"id": 1, "name": "A"}]}"#)
                .unwrap();
        assert_eq!(current.into_result().unwrap().len(), 1);

        let legacy: ListResponse =
            serde_json::from_str(r#"{"success": true, "clinics": [{"id": 1, "name": "A"}]}"#)
                .unwrap();
        assert_eq!(legacy.into_result().unwrap().len(), 1);
    }

    #[test]
    fn test_failure_is_backend_error() {
        let resp: ListResponse = serde_json::from_str(r#"{"success": false, "error": "x"}"#).unwrap();
        let err = resp.into_result().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Backend);
        assert_eq!(err.message, "x");
    }

    #[test]
    fn test_ack() {
        let ok: AckResponse = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(ok.into_result().is_ok());
        let bad: AckResponse = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert_eq!(bad.into_result().unwrap_err().message, "unknown error");
    }
}
