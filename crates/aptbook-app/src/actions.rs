//! Command implementations behind the CLI.

use std::sync::Arc;
use std::time::Duration;

use aptbook_core::{AppointmentDraft, AppointmentId, to_local_datetime, to_storage_instant};
use chrono::{Datelike, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::session::Session;
use crate::ticker::{Ticker, TickerConfig};
use crate::views;

/// Parses `YYYY-MM-DD`.
fn parse_date(input: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| AppError::invalid_input(format!("date must be YYYY-MM-DD, got {input:?}")))
}

/// Parses `HH:MM` (24-hour).
fn parse_time(input: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(input, "%H:%M")
        .map_err(|_| AppError::invalid_input(format!("time must be HH:MM, got {input:?}")))
}

/// Combines a local date and time into a storage instant.
fn storage_instant(date: NaiveDate, time: NaiveTime) -> AppResult<i64> {
    let local = Local
        .from_local_datetime(&date.and_time(time))
        .earliest()
        .ok_or_else(|| {
            AppError::invalid_input(format!("{date} {time} does not exist in the local timezone"))
        })?;
    Ok(to_storage_instant(&local))
}

/// `aptbook dashboard` (and the bare invocation).
pub async fn dashboard(session: &Session) -> AppResult<()> {
    let appointments = session.appointments().await?;
    let view = views::dashboard(&appointments, Local::now());
    print!("{}", views::render_dashboard(&view));
    Ok(())
}

/// `aptbook calendar [--year --month]`.
pub async fn calendar(session: &Session, year: Option<i32>, month: Option<u32>) -> AppResult<()> {
    let today = Local::now().date_naive();
    let year = year.unwrap_or_else(|| today.year());
    let month = month.unwrap_or_else(|| today.month());

    let appointments = session.appointments().await?;
    let view = views::MonthView::build(year, month, &appointments, today)
        .ok_or_else(|| AppError::invalid_input(format!("no such month: {year}-{month:02}")))?;
    print!("{}", views::render_month(&view));
    Ok(())
}

/// `aptbook list [--search]`.
pub async fn list(session: &Session, search: Option<String>) -> AppResult<()> {
    let appointments = session.appointments().await?;
    let matched = views::search(&appointments, search.as_deref().unwrap_or(""));
    print!("{}", views::render_list(&matched));
    Ok(())
}

/// `aptbook add`.
#[allow(clippy::too_many_arguments)]
pub async fn add(
    session: &Session,
    title: String,
    description: String,
    date: String,
    time: String,
    duration: u32,
    alarm_offset: Option<u32>,
) -> AppResult<()> {
    let instant = storage_instant(parse_date(&date)?, parse_time(&time)?)?;
    let draft = AppointmentDraft {
        title,
        description,
        date: instant,
        duration,
        alarm_enabled: alarm_offset.is_some(),
        alarm_offset,
    };

    let id = session.create(draft).await?;
    println!("created appointment #{id}");
    Ok(())
}

/// `aptbook edit <id>`: fetch the record, apply the overrides, replace.
#[allow(clippy::too_many_arguments)]
pub async fn edit(
    session: &Session,
    id: AppointmentId,
    title: Option<String>,
    description: Option<String>,
    date: Option<String>,
    time: Option<String>,
    duration: Option<u32>,
    alarm_offset: Option<u32>,
    no_alarm: bool,
) -> AppResult<()> {
    let current = session.appointment(id).await?;
    let mut draft = AppointmentDraft::from(current.clone());

    if let Some(title) = title {
        draft.title = title;
    }
    if let Some(description) = description {
        draft.description = description;
    }
    if date.is_some() || time.is_some() {
        let existing = to_local_datetime(current.date).ok_or_else(|| {
            AppError::invalid_input(format!("appointment #{id} has an unrepresentable start"))
        })?;
        let new_date = match &date {
            Some(d) => parse_date(d)?,
            None => existing.date_naive(),
        };
        let new_time = match &time {
            Some(t) => parse_time(t)?,
            None => existing.time(),
        };
        draft.date = storage_instant(new_date, new_time)?;
    }
    if let Some(duration) = duration {
        draft.duration = duration;
    }
    if no_alarm {
        draft.alarm_enabled = false;
        draft.alarm_offset = None;
    } else if alarm_offset.is_some() {
        draft.alarm_enabled = true;
        draft.alarm_offset = alarm_offset;
    }

    session.update(id, draft).await?;
    println!("updated appointment #{id}");
    Ok(())
}

/// `aptbook remove <id>`.
pub async fn remove(session: &Session, id: AppointmentId) -> AppResult<()> {
    session.delete(id).await?;
    println!("removed appointment #{id}");
    Ok(())
}

/// `aptbook watch`: run the reminder loop until Ctrl-C.
pub async fn watch(session: Arc<Session>, interval: Duration) -> AppResult<()> {
    let ticker = Ticker::new(TickerConfig::new(interval));
    let handle = ticker.handle();

    let tick_session = session.clone();
    let loop_task = tokio::spawn(async move {
        ticker
            .run(move || {
                let session = tick_session.clone();
                async move { session.tick(Utc::now()).await }
            })
            .await;
    });

    println!(
        "watching for reminders every {}s, press Ctrl-C to stop",
        interval.as_secs()
    );
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| AppError::invalid_input(format!("failed to listen for Ctrl-C: {e}")))?;

    info!("shutdown requested");
    if handle.stop().await.is_ok() {
        let _ = loop_task.await;
    } else {
        loop_task.abort();
    }

    let state = handle.state().await;
    println!(
        "stopped after {} ticks ({} failed)",
        state.ticks, state.failed_ticks
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_iso_and_rejects_garbage() {
        assert_eq!(
            parse_date("2025-03-03").unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()
        );
        assert!(parse_date("03/03/2025").is_err());
        assert!(parse_date("2025-13-01").is_err());
    }

    #[test]
    fn parse_time_is_twenty_four_hour() {
        assert_eq!(
            parse_time("09:30").unwrap(),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap()
        );
        assert_eq!(
            parse_time("18:05").unwrap(),
            NaiveTime::from_hms_opt(18, 5, 0).unwrap()
        );
        assert!(parse_time("6 pm").is_err());
    }

    #[test]
    fn storage_instant_round_trips_through_local() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        let time = NaiveTime::from_hms_opt(9, 30, 0).unwrap();

        let instant = storage_instant(date, time).unwrap();
        let back = to_local_datetime(instant).unwrap();
        assert_eq!(back.date_naive(), date);
        assert_eq!(back.time(), time);
    }
}
