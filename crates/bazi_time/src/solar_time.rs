//! True solar time from civil time and geographic longitude.
//!
//! correction = 4 min/deg * (lon - 120) + equation of time, where the
//! equation of time is the five-term Fourier fit from NOAA's solar
//! calculator notes. The result is rounded to the whole minute.

use std::f64::consts::PI;

use chrono::{Datelike, Duration, NaiveDateTime, Timelike};
use tracing::debug;

use crate::civil::REFERENCE_MERIDIAN_DEG;
use crate::error::TimeError;

/// Minutes of clock time per degree of longitude.
const MINUTES_PER_DEGREE: f64 = 4.0;

/// Geographic location of a birth place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoLocation {
    /// Longitude in degrees, east positive. Range: [-180, 180].
    pub longitude_deg: f64,
    /// Latitude in degrees, north positive. Range: [-90, 90]. Display only.
    pub latitude_deg: Option<f64>,
}

impl GeoLocation {
    /// Create a validated location.
    pub fn new(longitude_deg: f64, latitude_deg: Option<f64>) -> Result<Self, TimeError> {
        if !(-180.0..=180.0).contains(&longitude_deg) {
            return Err(TimeError::InvalidLocation("longitude must be in [-180, 180]"));
        }
        if let Some(lat) = latitude_deg {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(TimeError::InvalidLocation("latitude must be in [-90, 90]"));
            }
        }
        Ok(Self {
            longitude_deg,
            latitude_deg,
        })
    }
}

/// Which coordinate a degree string describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegreeKind {
    Longitude,
    Latitude,
}

/// Parse a coordinate such as `115.449444`, `-73.5`, `115°26'58"E` or
/// `36 29 25 N` into signed decimal degrees.
///
/// A `W` or `S` hemisphere letter negates the value unless an `E`/`N` is
/// also present; a leading minus on the degrees also negates it.
pub fn parse_degrees(text: &str, kind: DegreeKind) -> Result<f64, TimeError> {
    let s = text.trim().to_uppercase();
    if s.is_empty() {
        return Err(TimeError::Parse("empty coordinate".into()));
    }

    let mut sign = 1.0;
    if s.contains('W') || s.contains('S') {
        sign = -1.0;
    }
    if s.contains('E') || s.contains('N') {
        sign = 1.0;
    }

    let nums = numeric_tokens(&s)?;
    let (deg, min, sec) = match nums.as_slice() {
        [] => return Err(TimeError::Parse(format!("no number in coordinate {text:?}"))),
        [d] => (*d, 0.0, 0.0),
        [d, m] => (*d, *m, 0.0),
        [d, m, sec, ..] => (*d, *m, *sec),
    };
    if deg < 0.0 {
        sign = -1.0;
    }
    let value = sign * (deg.abs() + min / 60.0 + sec / 3600.0);

    let ok = match kind {
        DegreeKind::Longitude => (-180.0..=180.0).contains(&value),
        DegreeKind::Latitude => (-90.0..=90.0).contains(&value),
    };
    if !ok {
        return Err(TimeError::InvalidLocation(match kind {
            DegreeKind::Longitude => "longitude must be in [-180, 180]",
            DegreeKind::Latitude => "latitude must be in [-90, 90]",
        }));
    }
    Ok(value)
}

/// Signed decimal numbers embedded in `s`, in order of appearance.
fn numeric_tokens(s: &str) -> Result<Vec<f64>, TimeError> {
    s.split(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
        .filter(|t| t.chars().any(|c| c.is_ascii_digit()))
        .map(|t| {
            t.parse::<f64>()
                .map_err(|e| TimeError::Parse(format!("cannot parse {t:?} as degrees: {e}")))
        })
        .collect()
}

/// Equation of time in minutes (apparent minus mean solar time).
pub fn equation_of_time_minutes(local: &NaiveDateTime) -> f64 {
    let n = local.ordinal() as f64;
    let fractional_hour =
        local.hour() as f64 + local.minute() as f64 / 60.0 + local.second() as f64 / 3600.0;
    let gamma = 2.0 * PI / 365.0 * (n - 1.0 + (fractional_hour - 12.0) / 24.0);
    229.18
        * (0.000075 + 0.001868 * gamma.cos()
            - 0.032077 * gamma.sin()
            - 0.014615 * (2.0 * gamma).cos()
            - 0.040849 * (2.0 * gamma).sin())
}

/// Total correction in minutes from civil time to true solar time.
pub fn solar_time_correction_minutes(local: &NaiveDateTime, location: &GeoLocation) -> f64 {
    MINUTES_PER_DEGREE * (location.longitude_deg - REFERENCE_MERIDIAN_DEG)
        + equation_of_time_minutes(local)
}

/// Round to the whole minute: 30 seconds and over carry forward.
pub fn round_to_minute(dt: NaiveDateTime) -> Result<NaiveDateTime, TimeError> {
    let carried = if dt.second() >= 30 {
        dt.checked_add_signed(Duration::minutes(1))
            .ok_or(TimeError::Overflow)?
    } else {
        dt
    };
    carried
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .ok_or(TimeError::Overflow)
}

/// Convert a civil moment to true solar time at `location`.
pub fn true_solar_time(
    local: &NaiveDateTime,
    location: &GeoLocation,
) -> Result<NaiveDateTime, TimeError> {
    let correction = solar_time_correction_minutes(local, location);
    let micros = (correction * 60_000_000.0).round() as i64;
    let shifted = local
        .checked_add_signed(Duration::microseconds(micros))
        .ok_or(TimeError::Overflow)?;
    let corrected = round_to_minute(shifted)?;
    debug!(%local, correction_min = correction, %corrected, "true solar time");
    Ok(corrected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::civil::civil_time;

    #[test]
    fn location_validation() {
        assert!(GeoLocation::new(180.0, Some(-90.0)).is_ok());
        assert_eq!(
            GeoLocation::new(180.5, None),
            Err(TimeError::InvalidLocation("longitude must be in [-180, 180]"))
        );
        assert!(GeoLocation::new(0.0, Some(91.0)).is_err());
    }

    #[test]
    fn parse_plain_decimal() {
        let v = parse_degrees("115.449444", DegreeKind::Longitude).unwrap();
        assert!((v - 115.449444).abs() < 1e-12);
    }

    #[test]
    fn parse_dms_with_hemisphere() {
        let v = parse_degrees("115°26'58\"E", DegreeKind::Longitude).unwrap();
        assert!((v - (115.0 + 26.0 / 60.0 + 58.0 / 3600.0)).abs() < 1e-9);
        let w = parse_degrees("73 30 W", DegreeKind::Longitude).unwrap();
        assert!((w + 73.5).abs() < 1e-9);
        let s = parse_degrees("33.9S", DegreeKind::Latitude).unwrap();
        assert!((s + 33.9).abs() < 1e-9);
    }

    #[test]
    fn parse_leading_minus() {
        let v = parse_degrees("-122.4", DegreeKind::Longitude).unwrap();
        assert!((v + 122.4).abs() < 1e-12);
    }

    #[test]
    fn parse_out_of_range() {
        assert!(matches!(
            parse_degrees("181", DegreeKind::Longitude),
            Err(TimeError::InvalidLocation(_))
        ));
        assert!(matches!(
            parse_degrees("95 N", DegreeKind::Latitude),
            Err(TimeError::InvalidLocation(_))
        ));
        assert!(matches!(
            parse_degrees("", DegreeKind::Latitude),
            Err(TimeError::Parse(_))
        ));
        assert!(matches!(
            parse_degrees("east", DegreeKind::Longitude),
            Err(TimeError::Parse(_))
        ));
    }

    #[test]
    fn eot_early_april() {
        // Day 96 of 1986 just after midnight: about -3 minutes.
        let dt = civil_time(1986, 4, 6, 0, 20, 0).unwrap();
        let eot = equation_of_time_minutes(&dt);
        assert!((eot + 2.9685).abs() < 1e-3, "eot = {eot}");
    }

    #[test]
    fn reference_example() {
        let dt = civil_time(1986, 4, 6, 0, 20, 0).unwrap();
        let loc = GeoLocation::new(115.449444, Some(36.490278)).unwrap();
        let corrected = true_solar_time(&dt, &loc).unwrap();
        assert_eq!(corrected, civil_time(1986, 4, 5, 23, 59, 0).unwrap());
    }

    #[test]
    fn rounding_half_up() {
        let dt = civil_time(2000, 1, 1, 12, 0, 30).unwrap();
        assert_eq!(
            round_to_minute(dt).unwrap(),
            civil_time(2000, 1, 1, 12, 1, 0).unwrap()
        );
        let dt = civil_time(2000, 1, 1, 12, 0, 29).unwrap();
        assert_eq!(
            round_to_minute(dt).unwrap(),
            civil_time(2000, 1, 1, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn reference_meridian_only_eot() {
        let dt = civil_time(2024, 11, 3, 12, 0, 0).unwrap();
        let loc = GeoLocation::new(120.0, None).unwrap();
        let c = solar_time_correction_minutes(&dt, &loc);
        assert!((c - equation_of_time_minutes(&dt)).abs() < 1e-12);
        // Early November: sundial runs about 16 minutes fast.
        assert!(c > 15.0 && c < 17.5, "c = {c}");
    }
}
