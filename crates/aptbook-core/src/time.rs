//! Storage-instant conversions and small date predicates.
//!
//! The storage service exchanges timestamps as integer nanoseconds since the
//! Unix epoch ("storage instants"). The client only ever displays times down
//! to the minute, so conversions go through milliseconds and sub-millisecond
//! precision is lossy by design.

use chrono::{DateTime, Datelike, Duration, Local, TimeZone, Utc};

/// Number of nanoseconds in one millisecond.
pub const NANOS_PER_MILLISECOND: i64 = 1_000_000;

/// Converts a storage instant to a local wall-clock date-time.
///
/// Returns `None` only when the instant is outside the range chrono can
/// represent; callers treat such a record as malformed and skip it.
pub fn to_local_datetime(instant: i64) -> Option<DateTime<Local>> {
    let millis = instant / NANOS_PER_MILLISECOND;
    DateTime::<Utc>::from_timestamp_millis(millis).map(|dt| dt.with_timezone(&Local))
}

/// Converts a date-time back to a storage instant.
///
/// Round-trip law: `to_storage_instant(&to_local_datetime(t)?) == t` whenever
/// `t` is an exact multiple of [`NANOS_PER_MILLISECOND`].
pub fn to_storage_instant<Tz: TimeZone>(dt: &DateTime<Tz>) -> i64 {
    dt.timestamp_millis() * NANOS_PER_MILLISECOND
}

/// Returns true iff both date-times fall on the same calendar day.
pub fn same_calendar_day<Tz: TimeZone>(a: &DateTime<Tz>, b: &DateTime<Tz>) -> bool {
    a.year() == b.year() && a.month() == b.month() && a.day() == b.day()
}

/// Returns true iff `date` lies within the next `days` days from `now`,
/// inclusive on both ends: `now <= date <= now + days`.
pub fn is_within_next_days<Tz: TimeZone>(
    date: &DateTime<Tz>,
    days: i64,
    now: &DateTime<Tz>,
) -> bool {
    let horizon = now.clone() + Duration::days(days);
    *date >= *now && *date <= horizon
}

/// Formats a date-time as a long date, e.g. "February 5, 2025".
pub fn format_date(dt: &DateTime<Local>) -> String {
    dt.format("%B %-d, %Y").to_string()
}

/// Formats a date-time as a 12-hour clock time, e.g. "02:30 PM".
pub fn format_time(dt: &DateTime<Local>) -> String {
    dt.format("%I:%M %p").to_string()
}

/// Formats a date-time as "{date} at {time}".
pub fn format_date_time(dt: &DateTime<Local>) -> String {
    format!("{} at {}", format_date(dt), format_time(dt))
}
