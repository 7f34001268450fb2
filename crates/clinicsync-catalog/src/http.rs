//! HTTP implementation of the catalog client.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use clinicsync_core::config::CatalogConfig;
use clinicsync_core::error::{AppError, ErrorKind};
use clinicsync_core::result::AppResult;
use clinicsync_entity::clinic::{Clinic, ClinicDraft, ClinicId};

use crate::client::RemoteCatalogClient;
use crate::response::{AckResponse, ListResponse};

/// Talks to the catalog API over HTTP.
///
/// Mutations are sent as `application/x-www-form-urlencoded`, which is what
/// the API accepts; every answer is a JSON envelope.
#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    /// Shared connection pool.
    http: reqwest::Client,
    /// API base URL without trailing slash.
    base_url: String,
}

impl HttpCatalogClient {
    /// Build a client from configuration.
    pub fn new(config: &CatalogConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    "Failed to build HTTP client",
                    e,
                )
            })?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn clinics_url(&self) -> String {
        format!("{}/clinics", self.base_url)
    }

    fn clinic_url(&self, id: &ClinicId) -> String {
        format!("{}/clinics/{}", self.base_url, id)
    }
}

/// Turn a request failure into a transport error.
fn transport(action: &str, err: reqwest::Error) -> AppError {
    AppError::with_source(
        ErrorKind::Transport,
        format!("{action} failed: {err}"),
        err,
    )
}

/// Read and decode a JSON envelope, whatever the HTTP status.
///
/// An error status with a well-formed `success: false` envelope is a
/// backend error; anything unreadable is a transport error.
async fn read_envelope<T: DeserializeOwned>(
    action: &str,
    response: reqwest::Response,
) -> AppResult<T> {
    let status = response.status();
    let body = response.text().await.map_err(|e| transport(action, e))?;
    serde_json::from_str(&body).map_err(|e| {
        AppError::with_source(
            ErrorKind::Transport,
            format!("{action} returned an unreadable response (HTTP {status})"),
            e,
        )
    })
}

#[async_trait]
impl RemoteCatalogClient for HttpCatalogClient {
    async fn list(&self) -> AppResult<Vec<Clinic>> {
        let response = self
            .http
            .get(self.clinics_url())
            .send()
            .await
            .map_err(|e| transport("List clinics", e))?;

        let clinics = read_envelope::<ListResponse>("List clinics", response)
            .await?
            .into_result()?;
        debug!(count = clinics.len(), "Fetched clinics");
        Ok(clinics)
    }

    async fn create(&self, draft: &ClinicDraft) -> AppResult<()> {
        draft.check()?;
        let response = self
            .http
            .post(self.clinics_url())
            .form(draft)
            .send()
            .await
            .map_err(|e| transport("Create clinic", e))?;

        read_envelope::<AckResponse>("Create clinic", response)
            .await?
            .into_result()
    }

    async fn update(&self, id: &ClinicId, draft: &ClinicDraft) -> AppResult<()> {
        draft.check()?;
        let response = self
            .http
            .put(self.clinic_url(id))
            .form(draft)
            .send()
            .await
            .map_err(|e| transport("Update clinic", e))?;

        read_envelope::<AckResponse>("Update clinic", response)
            .await?
            .into_result()
    }

    async fn delete(&self, id: &ClinicId) -> AppResult<()> {
        let response = self
            .http
            .delete(self.clinic_url(id))
            .send()
            .await
            .map_err(|e| transport("Delete clinic", e))?;

        read_envelope::<AckResponse>("Delete clinic", response)
            .await?
            .into_result()
    }
}
