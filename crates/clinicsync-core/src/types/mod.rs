//! Core type definitions used across the ClinicSync workspace.

pub mod id;
pub mod slug;

pub use id::*;
pub use slug::slugify;
