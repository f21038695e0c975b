//! Error types for civil-time parsing, solar time and solar-term lookups.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from time parsing, location validation, or solar-term lookup.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum TimeError {
    /// Civil date/time text could not be parsed.
    Parse(String),
    /// Longitude or latitude outside its valid range.
    InvalidLocation(&'static str),
    /// Solar-term table parsing failed.
    TermTableParse(String),
    /// Requested moment is not bracketed by the loaded solar-term table.
    TermOutOfRange,
    /// Calendar arithmetic left the representable date range.
    Overflow,
    /// I/O error.
    Io(String),
}

impl Display for TimeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "time parse error: {msg}"),
            Self::InvalidLocation(msg) => write!(f, "invalid location: {msg}"),
            Self::TermTableParse(msg) => write!(f, "solar-term table parse error: {msg}"),
            Self::TermOutOfRange => write!(f, "moment outside solar-term table range"),
            Self::Overflow => write!(f, "calendar arithmetic overflow"),
            Self::Io(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

impl Error for TimeError {}

impl From<std::io::Error> for TimeError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
