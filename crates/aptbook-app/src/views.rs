//! Display-ready view models and plain-text rendering.
//!
//! Views are computed from a snapshot of the appointment list; they hold
//! no handles and perform no I/O. Appointments whose instant cannot be
//! represented locally are left out of date-bucketed views.

use aptbook_core::{
    Appointment, format_date_time, format_time, is_within_next_days, month_grid,
    same_calendar_day, to_local_datetime,
};
use chrono::{DateTime, Datelike, Local, NaiveDate};

/// How many upcoming appointments the dashboard shows.
const DASHBOARD_UPCOMING_LIMIT: usize = 5;

/// Days ahead that count as "upcoming".
const UPCOMING_WINDOW_DAYS: i64 = 7;

/// Dashboard statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    /// Total number of appointments.
    pub total: usize,
    /// Appointments starting within the next seven days.
    pub upcoming: usize,
}

/// The dashboard screen: stats, today's schedule and a short look-ahead.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub stats: Stats,
    /// Today's appointments, sorted by start time.
    pub today: Vec<Appointment>,
    /// Up to five appointments in the next seven days, excluding today,
    /// sorted by start time.
    pub upcoming: Vec<Appointment>,
}

/// Builds the dashboard for the given instant.
pub fn dashboard(appointments: &[Appointment], now: DateTime<Local>) -> DashboardView {
    let mut today = Vec::new();
    let mut upcoming = Vec::new();
    let mut upcoming_count = 0;

    for appointment in appointments {
        let Some(starts_at) = to_local_datetime(appointment.date) else {
            continue;
        };
        let is_today = same_calendar_day(&starts_at, &now);
        let in_window = is_within_next_days(&starts_at, UPCOMING_WINDOW_DAYS, &now);

        if in_window {
            upcoming_count += 1;
        }
        if is_today {
            today.push(appointment.clone());
        } else if in_window {
            upcoming.push(appointment.clone());
        }
    }

    today.sort_by_key(|a| a.date);
    upcoming.sort_by_key(|a| a.date);
    upcoming.truncate(DASHBOARD_UPCOMING_LIMIT);

    DashboardView {
        stats: Stats {
            total: appointments.len(),
            upcoming: upcoming_count,
        },
        today,
        upcoming,
    }
}

/// One cell of the month grid.
#[derive(Debug, Clone)]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// False for the padding days of the adjacent months.
    pub in_month: bool,
    pub is_today: bool,
    /// Appointments starting on this local day, sorted by start time.
    pub appointments: Vec<Appointment>,
}

/// A month of the calendar screen: whole weeks, Sunday through Saturday.
#[derive(Debug, Clone)]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    pub weeks: Vec<Vec<CalendarDay>>,
}

impl MonthView {
    /// Builds the view for `year`/`month`. Returns `None` for an invalid
    /// month number or an out-of-range year.
    pub fn build(
        year: i32,
        month: u32,
        appointments: &[Appointment],
        today: NaiveDate,
    ) -> Option<Self> {
        let grid = month_grid(year, month)?;

        let weeks = grid
            .chunks(7)
            .map(|week| {
                week.iter()
                    .map(|&date| {
                        let mut on_day: Vec<Appointment> = appointments
                            .iter()
                            .filter(|a| {
                                to_local_datetime(a.date)
                                    .is_some_and(|dt| dt.date_naive() == date)
                            })
                            .cloned()
                            .collect();
                        on_day.sort_by_key(|a| a.date);

                        CalendarDay {
                            date,
                            in_month: date.month() == month,
                            is_today: date == today,
                            appointments: on_day,
                        }
                    })
                    .collect()
            })
            .collect();

        Some(Self { year, month, weeks })
    }
}

/// The month before `(year, month)`.
pub fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 { (year - 1, 12) } else { (year, month - 1) }
}

/// The month after `(year, month)`.
pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 { (year + 1, 1) } else { (year, month + 1) }
}

/// Case-insensitive search over title and description, sorted by date
/// ascending. An empty query matches everything.
pub fn search(appointments: &[Appointment], query: &str) -> Vec<Appointment> {
    let needle = query.trim().to_lowercase();
    let mut matched: Vec<Appointment> = appointments
        .iter()
        .filter(|a| {
            needle.is_empty()
                || a.title.to_lowercase().contains(&needle)
                || a.description.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect();
    matched.sort_by_key(|a| a.date);
    matched
}

fn render_entry(out: &mut String, appointment: &Appointment) {
    let when = to_local_datetime(appointment.date)
        .map(|dt| format_date_time(&dt))
        .unwrap_or_else(|| "unknown time".to_string());
    let alarm = match (appointment.alarm_enabled, appointment.alarm_offset) {
        (true, Some(offset)) => format!("alarm {offset} min before"),
        _ => "no alarm".to_string(),
    };
    out.push_str(&format!(
        "  #{:<4} {} ({} min, {})\n",
        appointment.id, when, appointment.duration, alarm
    ));
    if !appointment.description.is_empty() {
        out.push_str(&format!("        {}\n", appointment.description));
    }
}

fn render_titled_entry(out: &mut String, appointment: &Appointment) {
    out.push_str(&format!("  {}\n", appointment.title));
    render_entry(out, appointment);
}

/// Renders the dashboard as plain text.
pub fn render_dashboard(view: &DashboardView) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Appointments: {} total, {} in the next 7 days\n",
        view.stats.total, view.stats.upcoming
    ));

    out.push_str("\nToday\n");
    if view.today.is_empty() {
        out.push_str("  nothing scheduled\n");
    }
    for appointment in &view.today {
        render_titled_entry(&mut out, appointment);
    }

    out.push_str("\nUpcoming\n");
    if view.upcoming.is_empty() {
        out.push_str("  nothing in the next 7 days\n");
    }
    for appointment in &view.upcoming {
        render_titled_entry(&mut out, appointment);
    }
    out
}

/// Renders the month view as a plain-text grid. Today is bracketed,
/// days with appointments carry a `*`, padding days are blank.
pub fn render_month(view: &MonthView) -> String {
    let Some(first) = NaiveDate::from_ymd_opt(view.year, view.month, 1) else {
        return String::new();
    };

    let mut out = String::new();
    out.push_str(&format!("{} {}\n", first.format("%B"), view.year));
    out.push_str("  Su   Mo   Tu   We   Th   Fr   Sa\n");

    for week in &view.weeks {
        for day in week {
            if !day.in_month {
                out.push_str("     ");
                continue;
            }
            let marker = if day.appointments.is_empty() { ' ' } else { '*' };
            if day.is_today {
                out.push_str(&format!("[{:>2}]{}", day.date.day(), marker));
            } else {
                out.push_str(&format!(" {:>2} {}", day.date.day(), marker));
            }
        }
        out.push('\n');
    }

    for week in &view.weeks {
        for day in week {
            for appointment in &day.appointments {
                if !day.in_month {
                    continue;
                }
                let time = to_local_datetime(appointment.date)
                    .map(|dt| format_time(&dt))
                    .unwrap_or_else(|| "??:??".to_string());
                out.push_str(&format!(
                    "  {:>2}: {} {}\n",
                    day.date.day(),
                    time,
                    appointment.title
                ));
            }
        }
    }
    out
}

/// Renders a search result list as plain text.
pub fn render_list(appointments: &[Appointment]) -> String {
    if appointments.is_empty() {
        return "no appointments found\n".to_string();
    }
    let mut out = String::new();
    for appointment in appointments {
        render_titled_entry(&mut out, appointment);
    }
    out
}
