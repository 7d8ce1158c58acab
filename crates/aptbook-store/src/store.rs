//! AppointmentStore trait definition.
//!
//! [`AppointmentStore`] is the abstraction over the remote storage service.
//! The client holds no authoritative copy of the data: every operation here
//! delegates to the service, and the in-memory list kept by the application
//! is a cache that is invalidated after each successful mutation.

use std::future::Future;
use std::pin::Pin;

use aptbook_core::{Appointment, AppointmentDraft, AppointmentId};

use crate::error::{StoreError, StoreResult};

/// A boxed future for async trait methods.
///
/// Boxed futures keep the trait object-safe so the application can hold an
/// `Arc<dyn AppointmentStore>` regardless of the concrete backend.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The storage-service boundary.
///
/// All timestamps cross this boundary as integer nanoseconds since the Unix
/// epoch and identifiers are opaque integers assigned by the service.
/// Updates have full-record replace semantics; there is no partial patch.
pub trait AppointmentStore: Send + Sync {
    /// Returns the name of this backend (e.g. "http", "memory").
    fn name(&self) -> &str;

    /// Fetches all appointments. No ordering is guaranteed; callers sort.
    fn list(&self) -> BoxFuture<'_, StoreResult<Vec<Appointment>>>;

    /// Fetches a single appointment.
    ///
    /// # Errors
    ///
    /// Fails with a not-found error if the appointment does not exist
    /// (e.g. it was deleted concurrently).
    fn get(&self, id: AppointmentId) -> BoxFuture<'_, StoreResult<Appointment>>;

    /// Creates an appointment and returns the service-assigned id.
    fn create(&self, draft: AppointmentDraft) -> BoxFuture<'_, StoreResult<AppointmentId>>;

    /// Replaces every field of an existing appointment.
    fn update(
        &self,
        id: AppointmentId,
        draft: AppointmentDraft,
    ) -> BoxFuture<'_, StoreResult<()>>;

    /// Deletes an appointment.
    fn delete(&self, id: AppointmentId) -> BoxFuture<'_, StoreResult<()>>;
}

/// A store that fails every operation with the same error.
///
/// Useful in tests and as a placeholder when a backend cannot be built.
#[derive(Debug)]
pub struct ErrorStore {
    error: StoreError,
}

impl ErrorStore {
    /// Creates a new error store.
    pub fn new(error: StoreError) -> Self {
        Self { error }
    }

    fn replicate(&self) -> StoreError {
        StoreError::new(self.error.code(), self.error.message())
    }
}

impl AppointmentStore for ErrorStore {
    fn name(&self) -> &str {
        "error"
    }

    fn list(&self) -> BoxFuture<'_, StoreResult<Vec<Appointment>>> {
        let error = self.replicate();
        Box::pin(async move { Err(error) })
    }

    fn get(&self, _id: AppointmentId) -> BoxFuture<'_, StoreResult<Appointment>> {
        let error = self.replicate();
        Box::pin(async move { Err(error) })
    }

    fn create(&self, _draft: AppointmentDraft) -> BoxFuture<'_, StoreResult<AppointmentId>> {
        let error = self.replicate();
        Box::pin(async move { Err(error) })
    }

    fn update(
        &self,
        _id: AppointmentId,
        _draft: AppointmentDraft,
    ) -> BoxFuture<'_, StoreResult<()>> {
        let error = self.replicate();
        Box::pin(async move { Err(error) })
    }

    fn delete(&self, _id: AppointmentId) -> BoxFuture<'_, StoreResult<()>> {
        let error = self.replicate();
        Box::pin(async move { Err(error) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreErrorCode;

    #[tokio::test]
    async fn error_store_fails_everything() {
        let store = ErrorStore::new(StoreError::network("service unavailable"));

        assert_eq!(store.name(), "error");
        assert_eq!(
            store.list().await.unwrap_err().code(),
            StoreErrorCode::NetworkError
        );
        assert_eq!(
            store.get(1).await.unwrap_err().code(),
            StoreErrorCode::NetworkError
        );
        assert_eq!(
            store.delete(1).await.unwrap_err().code(),
            StoreErrorCode::NetworkError
        );
    }
}
