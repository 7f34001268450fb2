//! Sync agent states.

use std::fmt;

use serde::Serialize;

/// Where a [`SyncAgent`](super::SyncAgent) is in its refresh cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum SyncState {
    /// Created, nothing fetched yet.
    Idle,
    /// A refresh is in flight.
    Loading,
    /// The latest refresh succeeded.
    Ready,
    /// The latest refresh failed; the previous render is still shown.
    Failed { reason: String },
}

impl SyncState {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Loading => write!(f, "loading"),
            Self::Ready => write!(f, "ready"),
            Self::Failed { reason } => write!(f, "failed: {reason}"),
        }
    }
}
