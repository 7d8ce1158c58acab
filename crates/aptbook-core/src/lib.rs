//! Core types: appointments, storage instants, calendar grid

pub mod appointment;
pub mod calendar;
pub mod time;
pub mod tracing;

pub use appointment::{Appointment, AppointmentDraft, AppointmentId, ValidationError};
pub use calendar::month_grid;
pub use time::{
    NANOS_PER_MILLISECOND, format_date, format_date_time, format_time, is_within_next_days,
    same_calendar_day, to_local_datetime, to_storage_instant,
};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
