use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RotationError {
    #[error("invalid clock time {0:?}: expected HH:MM")]
    Format(String),
    #[error("invalid layer configuration: {0}")]
    Configuration(String),
    #[error("invalid time range: end must not be before start")]
    InvalidTimeRange,
    #[error("date out of range after {0}")]
    OutOfRange(NaiveDate),
}
