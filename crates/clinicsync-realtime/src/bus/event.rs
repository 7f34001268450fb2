//! Values travelling over the bus.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use clinicsync_core::types::ContextId;

/// A key changed in the shared register.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageChange {
    /// The key that was written.
    pub key: String,
    /// The new value, `None` when the key was removed.
    pub new_value: Option<String>,
    /// Context that wrote it; `None` for a write seen from another process.
    pub origin: Option<ContextId>,
}

/// Event written under the bus key: `{type, timestamp, data}`.
///
/// `data` is an invalidation hint. Receivers re-fetch ground truth instead
/// of applying it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusEvent {
    /// Topic the event was published on.
    #[serde(rename = "type")]
    pub topic: String,
    /// Publication time in milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// Advisory payload.
    #[serde(default)]
    pub data: Value,
}

impl BusEvent {
    /// Create an event stamped with the current time.
    pub fn new(topic: impl Into<String>, data: Value) -> Self {
        Self {
            topic: topic.into(),
            timestamp: Utc::now().timestamp_millis(),
            data,
        }
    }

    /// Parse a stored value, returning `None` for anything that is not an event.
    pub fn parse(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }
}
