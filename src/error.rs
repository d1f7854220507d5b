use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

/// Which way the Sun fails to cross the horizon on a given date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolarCondition {
    /// Midnight sun: the Sun stays above the rise/set altitude all day.
    PolarDay,
    /// The Sun stays below the rise/set altitude all day.
    PolarNight,
}

impl std::fmt::Display for PolarCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolarCondition::PolarDay => write!(f, "polar day"),
            PolarCondition::PolarNight => write!(f, "polar night"),
        }
    }
}

#[derive(Debug, Error)]
pub enum VisibilityError {
    #[error("location not found: {0}")]
    LocationNotFound(String),

    #[error("no sunset/sunrise on {date} at latitude {latitude:.2}° ({condition})")]
    NoSolarEvent {
        date: NaiveDate,
        latitude: f64,
        condition: PolarCondition,
    },

    #[error("ephemeris '{model}' has no data for JD(TT) {jd_tt:.5}")]
    EphemerisUnavailable { model: String, jd_tt: f64 },

    #[error("observation window starts at {start} after it ends at {end}")]
    InvalidWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("grid step must be positive, got {0} minutes")]
    InvalidStep(i64),

    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("unknown timezone: {0}")]
    UnknownTimezone(String),

    #[error("catalog error: {0}")]
    Catalog(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, VisibilityError>;
