//! Appointment types.
//!
//! This module provides the persisted [`Appointment`] entity, the
//! [`AppointmentDraft`] payload used for create/update submissions, and the
//! client-side [`ValidationError`] taxonomy enforced before anything is sent
//! to the storage service.

use chrono::{DateTime, Duration, Local};
use serde::{Deserialize, Serialize};

use crate::time::to_local_datetime;

/// Identifier assigned by the storage service at creation.
///
/// Opaque to the client: comparable, serializable, never reinterpreted.
pub type AppointmentId = u64;

/// A scheduled appointment as persisted by the storage service.
///
/// `date` is a storage instant (integer nanoseconds since the Unix epoch).
/// `alarm_offset` is present iff `alarm_enabled`; the editing form enforces
/// this before submission and the service is trusted to echo consistent data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: AppointmentId,
    pub title: String,
    pub description: String,
    /// Start instant, nanoseconds since the Unix epoch.
    pub date: i64,
    /// Length in minutes.
    pub duration: u32,
    pub alarm_enabled: bool,
    /// Minutes before `date` at which a reminder should fire.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alarm_offset: Option<u32>,
}

impl Appointment {
    /// Builds an appointment from a draft and a service-assigned id.
    pub fn from_draft(id: AppointmentId, draft: AppointmentDraft) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            date: draft.date,
            duration: draft.duration,
            alarm_enabled: draft.alarm_enabled,
            alarm_offset: draft.alarm_offset,
        }
    }

    /// The start time as a local wall-clock date-time.
    ///
    /// `None` when the stored instant is outside the representable range;
    /// callers treat such a record as malformed.
    pub fn starts_at_local(&self) -> Option<DateTime<Local>> {
        to_local_datetime(self.date)
    }

    /// The end time (`start + duration`) as a local wall-clock date-time.
    pub fn ends_at_local(&self) -> Option<DateTime<Local>> {
        self.starts_at_local()
            .map(|start| start + Duration::minutes(i64::from(self.duration)))
    }
}

/// The fields of an appointment as submitted by the client.
///
/// The storage service assigns the id on create; updates resend every field
/// (full-record replace, no partial-patch semantics).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDraft {
    pub title: String,
    pub description: String,
    pub date: i64,
    pub duration: u32,
    pub alarm_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alarm_offset: Option<u32>,
}

impl AppointmentDraft {
    /// Trims the free-text fields, as the editing form does on submit.
    pub fn trimmed(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self.description = self.description.trim().to_string();
        self
    }

    /// Validates the draft before submission.
    ///
    /// Nothing is sent to the storage service when validation fails.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if self.duration == 0 {
            return Err(ValidationError::ZeroDuration);
        }
        match (self.alarm_enabled, self.alarm_offset) {
            (true, None) => Err(ValidationError::MissingAlarmOffset),
            (false, Some(_)) => Err(ValidationError::UnexpectedAlarmOffset),
            _ => Ok(()),
        }
    }
}

impl From<Appointment> for AppointmentDraft {
    fn from(appointment: Appointment) -> Self {
        Self {
            title: appointment.title,
            description: appointment.description,
            date: appointment.date,
            duration: appointment.duration,
            alarm_enabled: appointment.alarm_enabled,
            alarm_offset: appointment.alarm_offset,
        }
    }
}

/// A submission rejected before any request was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The title is empty or whitespace-only.
    #[error("title must not be empty")]
    EmptyTitle,
    /// The duration is zero.
    #[error("duration must be a positive number of minutes")]
    ZeroDuration,
    /// The alarm is enabled but no offset was given.
    #[error("alarm offset is required when the alarm is enabled")]
    MissingAlarmOffset,
    /// An offset was given although the alarm is disabled.
    #[error("alarm offset is only meaningful when the alarm is enabled")]
    UnexpectedAlarmOffset,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::NANOS_PER_MILLISECOND;
    use chrono::{TimeZone, Utc};

    fn draft() -> AppointmentDraft {
        let date = Utc
            .with_ymd_and_hms(2025, 2, 5, 10, 0, 0)
            .unwrap()
            .timestamp_millis()
            * NANOS_PER_MILLISECOND;
        AppointmentDraft {
            title: "Standup".to_string(),
            description: "Daily sync".to_string(),
            date,
            duration: 15,
            alarm_enabled: true,
            alarm_offset: Some(5),
        }
    }

    mod validation {
        use super::*;

        #[test]
        fn valid_draft_passes() {
            assert_eq!(draft().validate(), Ok(()));
        }

        #[test]
        fn empty_title_rejected() {
            let mut d = draft();
            d.title = "   ".to_string();
            assert_eq!(d.validate(), Err(ValidationError::EmptyTitle));
        }

        #[test]
        fn zero_duration_rejected() {
            let mut d = draft();
            d.duration = 0;
            assert_eq!(d.validate(), Err(ValidationError::ZeroDuration));
        }

        #[test]
        fn alarm_without_offset_rejected() {
            let mut d = draft();
            d.alarm_offset = None;
            assert_eq!(d.validate(), Err(ValidationError::MissingAlarmOffset));
        }

        #[test]
        fn offset_without_alarm_rejected() {
            let mut d = draft();
            d.alarm_enabled = false;
            assert_eq!(d.validate(), Err(ValidationError::UnexpectedAlarmOffset));
        }

        #[test]
        fn disabled_alarm_without_offset_passes() {
            let mut d = draft();
            d.alarm_enabled = false;
            d.alarm_offset = None;
            assert_eq!(d.validate(), Ok(()));
        }

        #[test]
        fn trimmed_strips_whitespace() {
            let mut d = draft();
            d.title = "  Standup  ".to_string();
            d.description = " notes \n".to_string();
            let d = d.trimmed();
            assert_eq!(d.title, "Standup");
            assert_eq!(d.description, "notes");
        }
    }

    mod wire_format {
        use super::*;

        #[test]
        fn serializes_camel_case() {
            let appointment = Appointment::from_draft(7, draft());
            let json = serde_json::to_value(&appointment).unwrap();
            assert_eq!(json["alarmEnabled"], serde_json::json!(true));
            assert_eq!(json["alarmOffset"], serde_json::json!(5));
            assert_eq!(json["duration"], serde_json::json!(15));
        }

        #[test]
        fn absent_offset_is_omitted_not_sentinel() {
            let mut d = draft();
            d.alarm_enabled = false;
            d.alarm_offset = None;
            let json = serde_json::to_value(&Appointment::from_draft(1, d)).unwrap();
            assert!(json.get("alarmOffset").is_none());
        }

        #[test]
        fn round_trips_through_json() {
            let appointment = Appointment::from_draft(42, draft());
            let json = serde_json::to_string(&appointment).unwrap();
            let parsed: Appointment = serde_json::from_str(&json).unwrap();
            assert_eq!(appointment, parsed);
        }
    }

    #[test]
    fn end_time_adds_duration() {
        let appointment = Appointment::from_draft(1, draft());
        let start = appointment.starts_at_local().unwrap();
        let end = appointment.ends_at_local().unwrap();
        assert_eq!(end - start, Duration::minutes(15));
    }
}
