//! Appointment cache with staleness tracking.
//!
//! The client holds no authoritative copy of the data: this cache stores
//! the last list fetched from the storage service. Every successful
//! mutation marks it stale, and stale data must be refetched before being
//! displayed again. A failed refetch leaves the previous list in place,
//! which the alarm engine tolerates (it re-evaluates on the next tick once
//! fresher data arrives).

use aptbook_core::Appointment;
use chrono::{DateTime, Utc};
use tracing::debug;

/// Cached appointment list plus staleness metadata.
#[derive(Debug, Default)]
pub struct AppointmentCache {
    appointments: Vec<Appointment>,
    fetched_at: Option<DateTime<Utc>>,
    stale: bool,
}

impl AppointmentCache {
    /// Creates an empty cache. An empty cache is stale by definition.
    pub fn new() -> Self {
        Self {
            appointments: Vec::new(),
            fetched_at: None,
            stale: true,
        }
    }

    /// The cached list. May be momentarily stale; check [`is_stale`].
    ///
    /// [`is_stale`]: Self::is_stale
    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    /// Returns true if the cache must be refetched before display.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// When the cached list was last fetched, if ever.
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    /// Marks the cache stale. Called after every successful mutation.
    pub fn mark_stale(&mut self) {
        self.stale = true;
        debug!("appointment cache marked stale");
    }

    /// Replaces the cached list with a freshly fetched one.
    pub fn store(&mut self, appointments: Vec<Appointment>) {
        debug!(count = appointments.len(), "appointment cache refreshed");
        self.appointments = appointments;
        self.fetched_at = Some(Utc::now());
        self.stale = false;
    }
}
