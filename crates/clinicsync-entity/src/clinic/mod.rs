//! Clinic catalog entities.

pub mod draft;
pub mod model;
pub mod status;

pub use draft::ClinicDraft;
pub use model::{Clinic, ClinicId};
pub use status::ClinicStatus;
