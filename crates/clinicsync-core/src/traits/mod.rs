//! Core traits defined in `clinicsync-core` and implemented by other crates.

pub mod kv_store;

pub use kv_store::KeyValueStore;
