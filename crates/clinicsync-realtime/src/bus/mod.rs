//! Same-session pub/sub over a shared key/value register.

pub mod context;
pub mod event;
pub mod poller;
pub mod registry;
pub mod shared;

pub use context::BusContext;
pub use event::{BusEvent, StorageChange};
pub use poller::spawn_external_poller;
pub use registry::ListenerId;
pub use shared::PersistentKeyValueBus;
