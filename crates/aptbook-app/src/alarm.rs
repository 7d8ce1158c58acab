//! Alarm evaluation engine.
//!
//! On every tick the engine decides which appointments should surface a
//! one-time reminder. De-duplication state is a set of [`AlarmKey`]s, a
//! composite of the appointment's id and its scheduled instant: editing an
//! appointment's date changes the key, so the alarm re-arms under the new
//! instant.

use std::collections::HashSet;

use aptbook_core::{
    Appointment, AppointmentId, NANOS_PER_MILLISECOND, format_date_time, to_local_datetime,
};
use chrono::{DateTime, Duration, Local, Utc};
use tracing::{debug, warn};

/// How long after an appointment's start a fired key is retained, in days.
///
/// Keys are pruned once the start has passed by this margin, bounding the
/// fired-set without risking a re-fire of a still-pending alarm.
const PRUNE_MARGIN_DAYS: i64 = 1;

/// Identity of one alarm occurrence: the appointment and its exact instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AlarmKey {
    pub id: AppointmentId,
    /// The appointment's scheduled storage instant at evaluation time.
    pub date: i64,
}

/// A reminder due for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub appointment_id: AppointmentId,
    pub title: String,
    /// The appointment's start in local time.
    pub starts_at: DateTime<Local>,
    /// Human-readable scheduled time, e.g. "February 5, 2025 at 10:00 AM".
    pub scheduled_for: String,
}

/// The alarm evaluation engine.
///
/// Holds the fired-set across ticks. The engine never performs I/O; the
/// caller delivers the returned reminders.
#[derive(Debug, Default)]
pub struct AlarmEngine {
    fired: HashSet<AlarmKey>,
}

impl AlarmEngine {
    /// Creates an engine with an empty fired-set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluates all appointments at `now` and returns the due reminders.
    ///
    /// An alarm is due iff `date - offset <= now < date` (half-open: no
    /// catch-up firing at or after the start instant) and it has not fired
    /// for this `(id, date)` occurrence before. A record whose instant
    /// cannot be represented is skipped and evaluation continues.
    pub fn evaluate(&mut self, appointments: &[Appointment], now: DateTime<Utc>) -> Vec<Reminder> {
        let mut due = Vec::new();

        for appointment in appointments {
            if !appointment.alarm_enabled {
                continue;
            }
            let Some(offset) = appointment.alarm_offset else {
                continue;
            };

            let Some(starts_at) =
                DateTime::<Utc>::from_timestamp_millis(appointment.date / NANOS_PER_MILLISECOND)
            else {
                warn!(
                    id = appointment.id,
                    date = appointment.date,
                    "skipping appointment with unrepresentable instant"
                );
                continue;
            };

            let alarm_time = starts_at - Duration::minutes(i64::from(offset));
            if !(alarm_time <= now && now < starts_at) {
                continue;
            }

            let key = AlarmKey {
                id: appointment.id,
                date: appointment.date,
            };
            if !self.fired.insert(key) {
                continue;
            }

            let local = to_local_datetime(appointment.date).unwrap_or_else(|| {
                // Representable in Utc above, so also representable here.
                starts_at.with_timezone(&Local)
            });
            debug!(id = appointment.id, title = %appointment.title, "alarm due");
            due.push(Reminder {
                appointment_id: appointment.id,
                title: appointment.title.clone(),
                starts_at: local,
                scheduled_for: format_date_time(&local),
            });
        }

        due
    }

    /// Drops fired keys whose appointment start passed more than
    /// [`PRUNE_MARGIN_DAYS`] ago.
    pub fn prune(&mut self, now: DateTime<Utc>) {
        let cutoff_millis = (now - Duration::days(PRUNE_MARGIN_DAYS)).timestamp_millis();
        let before = self.fired.len();
        self.fired
            .retain(|key| key.date / NANOS_PER_MILLISECOND >= cutoff_millis);
        let pruned = before - self.fired.len();
        if pruned > 0 {
            debug!(pruned = pruned, "pruned fired alarm keys");
        }
    }

    /// Number of alarm occurrences recorded as fired.
    pub fn fired_count(&self) -> usize {
        self.fired.len()
    }
}
