//! Civil (wall-clock) timestamps on the fixed UTC+8 reference.
//!
//! All moments in the engine are naive Beijing standard time. No timezone
//! conversion happens anywhere; callers in other zones convert first.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::TimeError;

/// Offset of the civil reference zone from UTC, in hours.
pub const CIVIL_UTC_OFFSET_HOURS: i32 = 8;

/// Central meridian of the civil reference zone, degrees east.
pub const REFERENCE_MERIDIAN_DEG: f64 = 120.0;

/// Display format used for every rendered moment.
pub const CIVIL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Build a civil moment from calendar fields.
pub fn civil_time(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
) -> Result<NaiveDateTime, TimeError> {
    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| TimeError::Parse(format!("invalid date {year:04}-{month:02}-{day:02}")))?;
    let time = NaiveTime::from_hms_opt(hour, minute, second)
        .ok_or_else(|| TimeError::Parse(format!("invalid time {hour:02}:{minute:02}:{second:02}")))?;
    Ok(date.and_time(time))
}

/// Parse `YYYY-MM-DD HH:MM[:SS]`, also accepting `T` as the separator.
pub fn parse_civil(s: &str) -> Result<NaiveDateTime, TimeError> {
    let s = s.trim();
    let normalized = s.replacen('T', " ", 1);
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&normalized, fmt) {
            return Ok(dt);
        }
    }
    Err(TimeError::Parse(format!(
        "expected YYYY-MM-DD HH:MM[:SS], got {s:?}"
    )))
}

/// Render a civil moment as `YYYY-MM-DD HH:MM:SS`.
pub fn format_civil(dt: &NaiveDateTime) -> String {
    dt.format(CIVIL_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parse_with_seconds() {
        let dt = parse_civil("1986-04-06 00:20:15").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (1986, 4, 6));
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (0, 20, 15));
    }

    #[test]
    fn parse_without_seconds_and_t_separator() {
        let dt = parse_civil("1986-04-06T00:20").unwrap();
        assert_eq!(dt, civil_time(1986, 4, 6, 0, 20, 0).unwrap());
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(matches!(parse_civil("yesterday"), Err(TimeError::Parse(_))));
        assert!(matches!(parse_civil("1986-02-30 10:00"), Err(TimeError::Parse(_))));
    }

    #[test]
    fn civil_time_rejects_bad_fields() {
        assert!(civil_time(2023, 2, 29, 0, 0, 0).is_err());
        assert!(civil_time(2024, 1, 1, 24, 0, 0).is_err());
    }

    #[test]
    fn display_format() {
        let dt = civil_time(1996, 4, 23, 14, 59, 0).unwrap();
        assert_eq!(format_civil(&dt), "1996-04-23 14:59:00");
    }
}
