//! Outcome of a notification log operation.

use serde::Serialize;

/// Whether an operation reached the persistent log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "durability", rename_all = "lowercase")]
pub enum Durability {
    /// Read from and written to the backing store.
    Persisted,
    /// The store failed; the operation used the in-memory copy instead.
    Degraded { reason: String },
}

/// A value plus how durable the operation producing it was.
///
/// Persistence failures never surface as errors; they show up here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreOutcome<T> {
    pub value: T,
    #[serde(flatten)]
    pub durability: Durability,
}

impl<T> StoreOutcome<T> {
    pub fn persisted(value: T) -> Self {
        Self {
            value,
            durability: Durability::Persisted,
        }
    }

    pub fn degraded(value: T, reason: impl Into<String>) -> Self {
        Self {
            value,
            durability: Durability::Degraded {
                reason: reason.into(),
            },
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self.durability, Durability::Degraded { .. })
    }

    pub fn into_value(self) -> T {
        self.value
    }

    /// Keep the durability, replace the value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> StoreOutcome<U> {
        StoreOutcome {
            value: f(self.value),
            durability: self.durability,
        }
    }
}
