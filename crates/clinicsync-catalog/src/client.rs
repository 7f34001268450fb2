//! Remote catalog client trait.

use async_trait::async_trait;

use clinicsync_core::result::AppResult;
use clinicsync_entity::clinic::{Clinic, ClinicDraft, ClinicId};

/// CRUD access to the clinic catalog.
///
/// Implementations map a transport failure to
/// [`ErrorKind::Transport`](clinicsync_core::error::ErrorKind::Transport) and a
/// `success: false` answer to
/// [`ErrorKind::Backend`](clinicsync_core::error::ErrorKind::Backend). Callers in
/// the sync layer treat both the same way.
#[async_trait]
pub trait RemoteCatalogClient: Send + Sync + std::fmt::Debug + 'static {
    /// Fetch every clinic.
    async fn list(&self) -> AppResult<Vec<Clinic>>;

    /// Create a clinic.
    async fn create(&self, draft: &ClinicDraft) -> AppResult<()>;

    /// Replace the fields of an existing clinic.
    async fn update(&self, id: &ClinicId, draft: &ClinicDraft) -> AppResult<()>;

    /// Delete a clinic.
    async fn delete(&self, id: &ClinicId) -> AppResult<()>;
}
