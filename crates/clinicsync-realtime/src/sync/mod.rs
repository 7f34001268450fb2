//! Keeps a context's catalog snapshot fresh.

pub mod agent;
pub mod sequence;
pub mod state;

pub use agent::{CatalogSnapshot, RefreshOutcome, RefreshTrigger, SyncAgent};
pub use sequence::{RequestSequencer, RequestTicket};
pub use state::SyncState;
