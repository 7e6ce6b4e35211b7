use super::clock::{midnight, next_midnight, resolve};
use super::RotationError;
use crate::model::{DailyRestrictions, RotationPeriod};
use chrono::{Datelike, NaiveDate};

/// Complément des fenêtres du jour de `date` : les plages où la couche ne
/// s'applique pas, en périodes non assignées.
///
/// Aucun créneau pour ce jour de semaine : la journée entière est couverte,
/// rien à retirer. Les fenêtres sont parcourues dans l'ordre fourni.
pub fn invert_daily_restrictions(
    date: NaiveDate,
    restrictions: &DailyRestrictions,
) -> Result<Vec<RotationPeriod>, RotationError> {
    let windows = restrictions.for_weekday(date.weekday());
    if windows.is_empty() {
        return Ok(Vec::new());
    }

    let mut out = Vec::with_capacity(windows.len() + 1);
    let mut cursor = midnight(date)?;
    for window in windows {
        let start = resolve(date, window.start)?;
        if cursor < start {
            out.push(RotationPeriod::unassigned(cursor, start));
        }
        cursor = resolve(date, window.end)?;
    }

    let day_end = next_midnight(date)?;
    if cursor < day_end {
        out.push(RotationPeriod::unassigned(cursor, day_end));
    }
    Ok(out)
}
