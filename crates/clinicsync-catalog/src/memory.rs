//! In-memory catalog for offline sessions and tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use clinicsync_core::error::AppError;
use clinicsync_core::result::AppResult;
use clinicsync_entity::clinic::{Clinic, ClinicDraft, ClinicId};

use crate::client::RemoteCatalogClient;

/// Catalog held in process memory.
///
/// [`fail_with`](Self::fail_with) makes every call answer with the given
/// error until cleared, which is how outages are simulated.
#[derive(Debug, Default)]
pub struct InMemoryCatalogClient {
    clinics: Mutex<Vec<Clinic>>,
    next_id: AtomicU64,
    failure: Mutex<Option<AppError>>,
    list_calls: AtomicU64,
}

impl InMemoryCatalogClient {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog pre-filled with clinics.
    pub fn with_clinics(clinics: Vec<Clinic>) -> Self {
        let catalog = Self::new();
        *catalog.clinics.lock().unwrap_or_else(|e| e.into_inner()) = clinics;
        catalog
    }

    /// Make every call fail with `error`, or succeed again with `None`.
    pub fn fail_with(&self, error: Option<AppError>) {
        *self.failure.lock().unwrap_or_else(|e| e.into_inner()) = error;
    }

    /// How many times [`list`](RemoteCatalogClient::list) was called.
    pub fn list_calls(&self) -> u64 {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn check_failure(&self) -> AppResult<()> {
        match self.failure.lock().unwrap_or_else(|e| e.into_inner()).as_ref() {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn apply(clinic: &mut Clinic, draft: &ClinicDraft) {
        clinic.name = draft.name.clone();
        clinic.description = draft.description.clone();
        clinic.address = draft.address.clone();
        clinic.city = Some(draft.city.clone());
        clinic.post_code = draft.post_code.clone();
        clinic.phone = draft.phone.clone();
        clinic.email = draft.email.clone();
        clinic.opening_hours = draft.opening_hours.clone();
        clinic.status = draft.status.clone();
        clinic.popular_treatment = draft.popular_treatment.clone();
        clinic.price_range = draft.price_range.clone();
        clinic.image_url = draft.image_url.clone();
        clinic.rating = Some(draft.rating);
    }
}

#[async_trait]
impl RemoteCatalogClient for InMemoryCatalogClient {
    async fn list(&self) -> AppResult<Vec<Clinic>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        Ok(self.clinics.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    async fn create(&self, draft: &ClinicDraft) -> AppResult<()> {
        self.check_failure()?;
        draft.check()?;
        let id = format!("mem_{:03}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let mut clinic = Clinic::new(id, draft.name.clone(), draft.status.clone());
        Self::apply(&mut clinic, draft);
        self.clinics
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(clinic);
        Ok(())
    }

    async fn update(&self, id: &ClinicId, draft: &ClinicDraft) -> AppResult<()> {
        self.check_failure()?;
        draft.check()?;
        let mut clinics = self.clinics.lock().unwrap_or_else(|e| e.into_inner());
        let clinic = clinics
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| AppError::backend(format!("Clinic not found: {id}")))?;
        Self::apply(clinic, draft);
        Ok(())
    }

    async fn delete(&self, id: &ClinicId) -> AppResult<()> {
        self.check_failure()?;
        let mut clinics = self.clinics.lock().unwrap_or_else(|e| e.into_inner());
        let before = clinics.len();
        clinics.retain(|c| &c.id != id);
        if clinics.len() == before {
            return Err(AppError::backend(format!("Clinic not found: {id}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinicsync_core::error::ErrorKind;
    use clinicsync_entity::clinic::ClinicStatus;

    #[tokio::test]
    async fn test_crud() {
        let catalog = InMemoryCatalogClient::new();
        catalog.create(&ClinicDraft::new("Glow", "Leeds")).await.unwrap();
        let listed = catalog.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].city.as_deref(), Some("Leeds"));

        let mut draft = ClinicDraft::new("Glow Plus", "York");
        draft.status = ClinicStatus::Inactive;
        catalog.update(&listed[0].id, &draft).await.unwrap();
        let listed = catalog.list().await.unwrap();
        assert_eq!(listed[0].name, "Glow Plus");
        assert_eq!(listed[0].status, ClinicStatus::Inactive);

        catalog.delete(&listed[0].id).await.unwrap();
        assert!(catalog.list().await.unwrap().is_empty());
        assert_eq!(catalog.list_calls(), 3);
    }

    #[tokio::test]
    async fn test_missing_clinic_is_backend_error() {
        let catalog = InMemoryCatalogClient::new();
        let err = catalog.delete(&ClinicId::new("nope")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Backend);
    }

    #[tokio::test]
    async fn test_fail_with() {
        let catalog = InMemoryCatalogClient::with_clinics(vec![Clinic::new(
            "1",
            "Glow",
            ClinicStatus::Active,
        )]);
        catalog.fail_with(Some(AppError::transport("offline")));
        assert_eq!(catalog.list().await.unwrap_err().kind, ErrorKind::Transport);
        catalog.fail_with(None);
        assert_eq!(catalog.list().await.unwrap().len(), 1);
    }
}
