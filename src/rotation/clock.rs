use super::RotationError;
use crate::model::ClockTime;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

/// Combine une date et une heure murale en instant UTC.
///
/// `24:00` est ramené à `00:00` du lendemain.
pub fn resolve(date: NaiveDate, time: ClockTime) -> Result<DateTime<Utc>, RotationError> {
    let (date, hour) = if time.is_end_of_day() {
        (date.succ_opt().ok_or(RotationError::OutOfRange(date))?, 0)
    } else {
        (date, time.hour())
    };
    let naive = NaiveTime::from_hms_opt(u32::from(hour), u32::from(time.minute()), 0)
        .ok_or_else(|| RotationError::Format(time.to_string()))?;
    Ok(Utc.from_utc_datetime(&date.and_time(naive)))
}

/// Variante de [`resolve`] qui part d'une chaîne `HH:MM`.
pub fn resolve_str(date: NaiveDate, time: &str) -> Result<DateTime<Utc>, RotationError> {
    resolve(date, time.parse()?)
}

pub(super) fn midnight(date: NaiveDate) -> Result<DateTime<Utc>, RotationError> {
    resolve(date, ClockTime::MIDNIGHT)
}

pub(super) fn next_midnight(date: NaiveDate) -> Result<DateTime<Utc>, RotationError> {
    resolve(date, ClockTime::END_OF_DAY)
}
