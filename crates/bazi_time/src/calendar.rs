//! Whole-calendar-unit arithmetic and double-hour (branch) indexing.
//!
//! Year and month steps are calendar steps, not fixed durations: the day
//! of month is clamped to the target month's length (Feb 29 + 1 year is
//! Feb 28). Day and hour steps are exact.

use chrono::{Days, Duration, Months, NaiveDateTime, Timelike};

use crate::error::TimeError;

/// Advance `start` by `years`, then `months`, then `days`, then `hours`.
pub fn add_calendar_units(
    start: &NaiveDateTime,
    years: u32,
    months: u32,
    days: u32,
    hours: u32,
) -> Result<NaiveDateTime, TimeError> {
    let year_months = years.checked_mul(12).ok_or(TimeError::Overflow)?;
    start
        .checked_add_months(Months::new(year_months))
        .and_then(|t| t.checked_add_months(Months::new(months)))
        .and_then(|t| t.checked_add_days(Days::new(u64::from(days))))
        .and_then(|t| t.checked_add_signed(Duration::hours(i64::from(hours))))
        .ok_or(TimeError::Overflow)
}

/// Whole calendar days from `start`'s date to `end`'s date (time of day ignored).
pub fn calendar_days_between(start: &NaiveDateTime, end: &NaiveDateTime) -> i64 {
    (end.date() - start.date()).num_days()
}

/// Double-hour branch index (0 = 子 .. 11 = 亥).
///
/// 23:00-00:59 is 子 (0); each following two-hour block advances by one.
pub fn hour_branch_index(dt: &NaiveDateTime) -> u8 {
    (((dt.hour() + 1) / 2) % 12) as u8
}

/// Branch index used when counting double-hours between two boundaries.
///
/// Identical to [`hour_branch_index`] except that 23:xx counts as 11, so
/// the late half of 子 sits at the end of the day it belongs to on the
/// wall clock rather than wrapping to the start.
pub fn boundary_hour_index(dt: &NaiveDateTime) -> u8 {
    if dt.hour() == 23 {
        11
    } else {
        hour_branch_index(dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::civil::civil_time;

    #[test]
    fn add_units_in_order() {
        let t = civil_time(1986, 4, 5, 23, 59, 0).unwrap();
        let r = add_calendar_units(&t, 10, 0, 17, 15).unwrap();
        assert_eq!(r, civil_time(1996, 4, 23, 14, 59, 0).unwrap());
    }

    #[test]
    fn add_months_clamps_day() {
        let t = civil_time(1986, 1, 31, 8, 0, 0).unwrap();
        let r = add_calendar_units(&t, 0, 1, 0, 0).unwrap();
        assert_eq!(r, civil_time(1986, 2, 28, 8, 0, 0).unwrap());
    }

    #[test]
    fn add_year_from_leap_day() {
        let t = civil_time(2024, 2, 29, 12, 0, 0).unwrap();
        let r = add_calendar_units(&t, 1, 0, 0, 0).unwrap();
        assert_eq!(r, civil_time(2025, 2, 28, 12, 0, 0).unwrap());
    }

    #[test]
    fn add_hours_crosses_midnight() {
        let t = civil_time(1986, 6, 17, 0, 20, 0).unwrap();
        let r = add_calendar_units(&t, 0, 0, 0, 27).unwrap();
        assert_eq!(r, civil_time(1986, 6, 18, 3, 20, 0).unwrap());
    }

    #[test]
    fn days_between_ignores_time() {
        let a = civil_time(1986, 4, 5, 23, 59, 0).unwrap();
        let b = civil_time(1986, 4, 6, 0, 1, 0).unwrap();
        assert_eq!(calendar_days_between(&a, &b), 1);
        let c = civil_time(1986, 5, 6, 3, 30, 42).unwrap();
        assert_eq!(calendar_days_between(&b, &c), 30);
    }

    #[test]
    fn hour_branch_boundaries() {
        let at = |h, m| civil_time(2000, 1, 1, h, m, 0).unwrap();
        assert_eq!(hour_branch_index(&at(0, 0)), 0);
        assert_eq!(hour_branch_index(&at(0, 59)), 0);
        assert_eq!(hour_branch_index(&at(1, 0)), 1);
        assert_eq!(hour_branch_index(&at(2, 59)), 1);
        assert_eq!(hour_branch_index(&at(3, 30)), 2);
        assert_eq!(hour_branch_index(&at(11, 0)), 6);
        assert_eq!(hour_branch_index(&at(22, 59)), 11);
        assert_eq!(hour_branch_index(&at(23, 0)), 0);
    }

    #[test]
    fn boundary_index_wraps_late_zi() {
        let late = civil_time(2000, 1, 1, 23, 15, 0).unwrap();
        assert_eq!(boundary_hour_index(&late), 11);
        let early = civil_time(2000, 1, 1, 0, 15, 0).unwrap();
        assert_eq!(boundary_hour_index(&early), 0);
    }
}
