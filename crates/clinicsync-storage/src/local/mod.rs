//! Local filesystem key/value store.

pub mod store;

pub use store::LocalKeyValueStore;
