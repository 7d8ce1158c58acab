//! HTTP client for the remote storage service.
//!
//! The service exposes a small JSON REST surface:
//!
//! - `GET    /appointments`      — all appointments
//! - `POST   /appointments`      — create, returns `{"id": <u64>}`
//! - `GET    /appointments/{id}` — single appointment
//! - `PUT    /appointments/{id}` — full-record replace
//! - `DELETE /appointments/{id}` — delete
//!
//! Timestamps cross the wire as integer nanoseconds since the Unix epoch;
//! `alarmOffset` is present-with-value or absent, never a sentinel.

use std::time::Duration;

use aptbook_core::{Appointment, AppointmentDraft, AppointmentId};
use serde::Deserialize;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::store::{AppointmentStore, BoxFuture};

/// Response body of a create request.
#[derive(Debug, Deserialize)]
struct CreateResponse {
    id: AppointmentId,
}

/// An [`AppointmentStore`] backed by the storage service's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpStore {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpStore {
    /// Creates a new HTTP store for the service at `base_url`.
    ///
    /// # Errors
    ///
    /// Fails if the underlying HTTP client cannot be constructed.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> StoreResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::internal("failed to build HTTP client").with_source(e))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn collection_url(&self) -> String {
        format!("{}/appointments", self.base_url)
    }

    fn record_url(&self, id: AppointmentId) -> String {
        format!("{}/appointments/{id}", self.base_url)
    }

    /// Sends a request and maps transport and status failures to
    /// [`StoreError`]s. `id` is used for not-found messages when known.
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        id: Option<AppointmentId>,
    ) -> StoreResult<reqwest::Response> {
        let response = request
            .send()
            .await
            .map_err(|e| StoreError::network("request to storage service failed").with_source(e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        debug!(status = %status, body = %body, "storage service rejected request");

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(match id {
                Some(id) => StoreError::not_found(id),
                None => StoreError::bad_request(format!("unknown resource: {body}")),
            });
        }
        if status.is_server_error() {
            return Err(StoreError::server(format!(
                "storage service error {status}: {body}"
            )));
        }
        Err(StoreError::bad_request(format!(
            "storage service rejected request with {status}: {body}"
        )))
    }

    async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> StoreResult<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| StoreError::invalid_response("malformed storage response").with_source(e))
    }
}

impl AppointmentStore for HttpStore {
    fn name(&self) -> &str {
        "http"
    }

    fn list(&self) -> BoxFuture<'_, StoreResult<Vec<Appointment>>> {
        Box::pin(async move {
            let request = self.http_client.get(self.collection_url());
            let response = self.send(request, None).await?;
            let appointments: Vec<Appointment> = Self::decode(response).await?;
            debug!(count = appointments.len(), "fetched appointments");
            Ok(appointments)
        })
    }

    fn get(&self, id: AppointmentId) -> BoxFuture<'_, StoreResult<Appointment>> {
        Box::pin(async move {
            let request = self.http_client.get(self.record_url(id));
            let response = self.send(request, Some(id)).await?;
            Self::decode(response).await
        })
    }

    fn create(&self, draft: AppointmentDraft) -> BoxFuture<'_, StoreResult<AppointmentId>> {
        Box::pin(async move {
            let request = self.http_client.post(self.collection_url()).json(&draft);
            let response = self.send(request, None).await?;
            let created: CreateResponse = Self::decode(response).await?;
            debug!(id = created.id, "appointment created");
            Ok(created.id)
        })
    }

    fn update(
        &self,
        id: AppointmentId,
        draft: AppointmentDraft,
    ) -> BoxFuture<'_, StoreResult<()>> {
        Box::pin(async move {
            let request = self.http_client.put(self.record_url(id)).json(&draft);
            self.send(request, Some(id)).await?;
            debug!(id = id, "appointment updated");
            Ok(())
        })
    }

    fn delete(&self, id: AppointmentId) -> BoxFuture<'_, StoreResult<()>> {
        Box::pin(async move {
            let request = self.http_client.delete(self.record_url(id));
            self.send(request, Some(id)).await?;
            debug!(id = id, "appointment deleted");
            Ok(())
        })
    }
}
