//! Month-grid derivation for the calendar view.
//!
//! A month grid is the 7-column day sequence a calendar renders: the trailing
//! days of the previous month needed so the first row starts on a Sunday,
//! every day of the target month, and the leading days of the next month
//! needed so the last row ends on a Saturday.

use chrono::{Datelike, Duration, Months, NaiveDate};

/// Produces the day sequence for a month view.
///
/// The result length is always a multiple of 7. Dates outside the target
/// month carry no tag; callers compare `date.month()` against the target
/// month at render time.
///
/// Returns `None` when `month` is not in `1..=12` or the month is outside
/// the representable date range.
pub fn month_grid(year: i32, month: u32) -> Option<Vec<NaiveDate>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last = first.checked_add_months(Months::new(1))?.pred_opt()?;

    let mut days = Vec::with_capacity(42);

    let lead = i64::from(first.weekday().num_days_from_sunday());
    for offset in (1..=lead).rev() {
        days.push(first - Duration::days(offset));
    }

    let mut day = first;
    while day <= last {
        days.push(day);
        day = day.succ_opt()?;
    }

    let trail = i64::from(6 - last.weekday().num_days_from_sunday());
    for offset in 1..=trail {
        days.push(last + Duration::days(offset));
    }

    Some(days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn length_is_a_multiple_of_seven() {
        for month in 1..=12 {
            let grid = month_grid(2025, month).unwrap();
            assert_eq!(grid.len() % 7, 0, "month {month}");
        }
    }

    #[test]
    fn starts_sunday_ends_saturday() {
        for month in 1..=12 {
            let grid = month_grid(2025, month).unwrap();
            assert_eq!(grid.first().unwrap().weekday(), Weekday::Sun);
            assert_eq!(grid.last().unwrap().weekday(), Weekday::Sat);
        }
    }

    #[test]
    fn contains_every_day_of_target_month_once() {
        let grid = month_grid(2025, 2).unwrap();
        for d in 1..=28 {
            let count = grid.iter().filter(|day| **day == date(2025, 2, d)).count();
            assert_eq!(count, 1, "day {d}");
        }
    }

    #[test]
    fn february_2025_pads_both_ends() {
        // Feb 1 2025 is a Saturday, Feb 28 a Friday.
        let grid = month_grid(2025, 2).unwrap();
        assert_eq!(grid.len(), 35);
        assert_eq!(grid[0], date(2025, 1, 26));
        assert_eq!(*grid.last().unwrap(), date(2025, 3, 1));
    }

    #[test]
    fn month_starting_on_sunday_has_no_leading_pad() {
        // June 1 2025 is a Sunday.
        let grid = month_grid(2025, 6).unwrap();
        assert_eq!(grid[0], date(2025, 6, 1));
    }

    #[test]
    fn month_ending_on_saturday_has_no_trailing_pad() {
        // May 31 2025 is a Saturday.
        let grid = month_grid(2025, 5).unwrap();
        assert_eq!(*grid.last().unwrap(), date(2025, 5, 31));
    }

    #[test]
    fn december_wraps_into_next_year() {
        let grid = month_grid(2025, 12).unwrap();
        assert!(grid.iter().any(|d| *d == date(2026, 1, 1)));
    }

    #[test]
    fn leap_february_has_29_days() {
        let grid = month_grid(2024, 2).unwrap();
        assert!(grid.contains(&date(2024, 2, 29)));
    }

    #[test]
    fn invalid_month_is_none() {
        assert!(month_grid(2025, 0).is_none());
        assert!(month_grid(2025, 13).is_none());
    }
}
