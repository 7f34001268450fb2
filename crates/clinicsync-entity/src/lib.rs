//! # clinicsync-entity
//!
//! Domain models for ClinicSync. Notification records are what the
//! notification log persists; clinics are what the remote catalog serves.
//! Field names follow the JSON the front end already stores and receives.

pub mod clinic;
pub mod notification;
