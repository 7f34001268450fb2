//! # clinicsync-core
//!
//! Core crate for ClinicSync. Contains the key/value store trait,
//! configuration schemas, typed identifiers, slug derivation, and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other ClinicSync crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
