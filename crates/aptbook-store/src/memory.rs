//! In-memory appointment store.
//!
//! A process-local [`AppointmentStore`] implementation with the same
//! contract as the remote service: ids are assigned at creation, updates
//! replace the full record, and reads of missing ids fail not-found. Used
//! as the test fake throughout the workspace.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use aptbook_core::{Appointment, AppointmentDraft, AppointmentId};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::store::{AppointmentStore, BoxFuture};

/// An in-memory store keyed by appointment id.
#[derive(Debug, Default)]
pub struct MemoryStore {
    appointments: Mutex<HashMap<AppointmentId, Appointment>>,
    next_id: AtomicU64,
}

impl MemoryStore {
    /// Creates an empty store. The first assigned id is 1.
    pub fn new() -> Self {
        Self {
            appointments: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Returns the number of stored appointments.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if no appointments are stored.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<AppointmentId, Appointment>> {
        // A poisoned lock means a panic mid-mutation in another test thread;
        // the map itself is still structurally sound.
        self.appointments
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl AppointmentStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn list(&self) -> BoxFuture<'_, StoreResult<Vec<Appointment>>> {
        let appointments: Vec<Appointment> = self.lock().values().cloned().collect();
        Box::pin(async move { Ok(appointments) })
    }

    fn get(&self, id: AppointmentId) -> BoxFuture<'_, StoreResult<Appointment>> {
        let result = self
            .lock()
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(id));
        Box::pin(async move { result })
    }

    fn create(&self, draft: AppointmentDraft) -> BoxFuture<'_, StoreResult<AppointmentId>> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.lock().insert(id, Appointment::from_draft(id, draft));
        debug!(id = id, "created appointment");
        Box::pin(async move { Ok(id) })
    }

    fn update(
        &self,
        id: AppointmentId,
        draft: AppointmentDraft,
    ) -> BoxFuture<'_, StoreResult<()>> {
        let result = {
            let mut appointments = self.lock();
            if appointments.contains_key(&id) {
                appointments.insert(id, Appointment::from_draft(id, draft));
                debug!(id = id, "updated appointment");
                Ok(())
            } else {
                Err(StoreError::not_found(id))
            }
        };
        Box::pin(async move { result })
    }

    fn delete(&self, id: AppointmentId) -> BoxFuture<'_, StoreResult<()>> {
        let result = match self.lock().remove(&id) {
            Some(_) => {
                debug!(id = id, "deleted appointment");
                Ok(())
            }
            None => Err(StoreError::not_found(id)),
        };
        Box::pin(async move { result })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str) -> AppointmentDraft {
        AppointmentDraft {
            title: title.to_string(),
            description: String::new(),
            date: 1_700_000_000_000 * 1_000_000,
            duration: 30,
            alarm_enabled: false,
            alarm_offset: None,
        }
    }

    #[tokio::test]
    async fn create_assigns_sequential_ids() {
        let store = MemoryStore::new();
        let a = store.create(draft("a")).await.unwrap();
        let b = store.create(draft("b")).await.unwrap();
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn get_returns_created_record() {
        let store = MemoryStore::new();
        let id = store.create(draft("Checkup")).await.unwrap();

        let fetched = store.get(id).await.unwrap();
        assert_eq!(fetched.id, id);
        assert_eq!(fetched.title, "Checkup");
    }

    #[tokio::test]
    async fn get_missing_fails_not_found() {
        let store = MemoryStore::new();
        let err = store.get(99).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn update_replaces_full_record() {
        let store = MemoryStore::new();
        let id = store.create(draft("Old")).await.unwrap();

        let mut replacement = draft("New");
        replacement.duration = 45;
        store.update(id, replacement).await.unwrap();

        let fetched = store.get(id).await.unwrap();
        assert_eq!(fetched.title, "New");
        assert_eq!(fetched.duration, 45);
    }

    #[tokio::test]
    async fn update_missing_fails_not_found() {
        let store = MemoryStore::new();
        assert!(store.update(5, draft("x")).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn delete_removes_record() {
        let store = MemoryStore::new();
        let id = store.create(draft("gone")).await.unwrap();

        store.delete(id).await.unwrap();
        assert!(store.get(id).await.unwrap_err().is_not_found());
        assert!(store.delete(id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn list_returns_all_records() {
        let store = MemoryStore::new();
        store.create(draft("a")).await.unwrap();
        store.create(draft("b")).await.unwrap();
        store.create(draft("c")).await.unwrap();

        let all = store.list().await.unwrap();
        assert_eq!(all.len(), 3);
    }
}
