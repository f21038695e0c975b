//! Error types for chart parsing and rule evaluation.

use std::error::Error;
use std::fmt::{Display, Formatter};

use bazi_time::TimeError;

/// Errors from chart construction and derived judgments.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum BaziError {
    /// Text input (pillars, gender, symbols) could not be recognised.
    MalformedInput(String),
    /// A required input was missing or out of its allowed set.
    Precondition(&'static str),
    /// Error from time conversion or solar-term lookup.
    Time(TimeError),
}

impl Display for BaziError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedInput(msg) => write!(f, "malformed input: {msg}"),
            Self::Precondition(msg) => write!(f, "precondition failed: {msg}"),
            Self::Time(e) => write!(f, "time error: {e}"),
        }
    }
}

impl Error for BaziError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Time(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TimeError> for BaziError {
    fn from(e: TimeError) -> Self {
        Self::Time(e)
    }
}
