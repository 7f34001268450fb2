//! # clinicsync-realtime
//!
//! Cross-context synchronization for the ClinicSync front end. Provides:
//!
//! - A persistent key/value bus: a write from one context is delivered
//!   to every *other* attached context observing that key
//! - A bounded, persistent notification log with read/unread state,
//!   badge and toast rendering
//! - A catalog sync agent that refreshes on bus invalidations and on a
//!   fallback timer, where the latest issued request wins
//! - A catalog editor for the admin flow (commit, then invalidate)
//! - Session contexts tying the above together

pub mod bus;
pub mod editor;
pub mod notification;
pub mod session;
pub mod surface;
pub mod sync;

pub use bus::{BusContext, BusEvent, PersistentKeyValueBus};
pub use editor::{CatalogEditor, EditReport};
pub use notification::NotificationStore;
pub use session::{SessionContext, SessionSurfaces};
pub use surface::{CatalogSurface, LogSurface, Notice, NotificationSurface, RecordingSurface};
pub use sync::{SyncAgent, SyncState};
