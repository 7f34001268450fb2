//! # clinicsync-storage
//!
//! Key/value store providers for the ClinicSync session register:
//!
//! - **memory**: process-local map using [dashmap](https://crates.io/crates/dashmap)
//! - **local**: one JSON file per key under a root directory, so the
//!   notification log and the last bus event survive restarts and can be
//!   shared between processes on the same machine
//!
//! The provider is selected at runtime based on configuration.

pub mod keys;
#[cfg(feature = "local")]
pub mod local;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;

pub use provider::StoreManager;
