//! # clinicsync-catalog
//!
//! The clinic catalog as seen from the front end:
//!
//! - [`RemoteCatalogClient`], the success/failure contract the sync layer
//!   depends on, with an HTTP implementation and an in-memory one
//! - the JSON envelopes the catalog API answers with
//! - derivation of the rendered clinic cards from a catalog snapshot

pub mod client;
pub mod http;
pub mod memory;
pub mod response;
pub mod view;

pub use client::RemoteCatalogClient;
pub use http::HttpCatalogClient;
pub use memory::InMemoryCatalogClient;
pub use view::{CatalogView, ClinicCard};
