//! Civil time, true solar time and solar-term boundaries.
//!
//! This crate provides:
//! - Civil (UTC+8) timestamp parsing and formatting
//! - Equation-of-time based true-solar-time correction
//! - Whole-calendar-unit addition and double-hour indexing
//! - The 24 solar terms and a file-backed jie boundary table

pub mod calendar;
pub mod civil;
pub mod error;
pub mod solar_time;
pub mod terms;

pub use calendar::{
    add_calendar_units, boundary_hour_index, calendar_days_between, hour_branch_index,
};
pub use civil::{
    CIVIL_FORMAT, CIVIL_UTC_OFFSET_HOURS, REFERENCE_MERIDIAN_DEG, civil_time, format_civil,
    parse_civil,
};
pub use error::TimeError;
pub use solar_time::{
    DegreeKind, GeoLocation, equation_of_time_minutes, parse_degrees, round_to_minute,
    solar_time_correction_minutes, true_solar_time,
};
pub use terms::{ALL_SOLAR_TERMS, SolarTerm, SolarTermEvent, SolarTermSource, SolarTermTable};

/// Re-exported so downstream crates name the same moment type.
pub use chrono::NaiveDateTime;
