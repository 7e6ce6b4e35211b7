use crate::model::RotationPeriod;

/// Fusionne `new` dans une liste ordonnée et sans chevauchement.
///
/// `new` écrase ce qu'il recouvre ; les morceaux qui dépassent de part et
/// d'autre sont conservés avec leur assignation. Une période non assignée
/// n'est jamais insérée : elle ne fait que creuser un trou.
pub fn coalesce_rotation_period(
    periods: Vec<RotationPeriod>,
    new: RotationPeriod,
) -> Vec<RotationPeriod> {
    let (Some(first), Some(last)) = (periods.first(), periods.last()) else {
        return match new.user_id {
            Some(_) => vec![new],
            None => Vec::new(),
        };
    };

    // ajout en tête / en queue sans recouvrement
    if new.end_time.is_some_and(|end| end < first.start_time) {
        if new.user_id.is_none() {
            return periods;
        }
        let mut out = Vec::with_capacity(periods.len() + 1);
        out.push(new);
        out.extend(periods);
        return out;
    }
    if last.end_time.is_some_and(|end| new.start_time > end) {
        let mut periods = periods;
        if new.user_id.is_some() {
            periods.push(new);
        }
        return periods;
    }

    let mut out = Vec::with_capacity(periods.len() + 2);
    let mut suffix = None;
    let mut tail = Vec::new();
    for period in periods {
        if period.ends_at_or_before(new.start_time) {
            out.push(period);
        } else if new.ends_at_or_before(period.start_time) {
            tail.push(period);
        } else {
            if period.start_time < new.start_time {
                out.push(period.slice(period.start_time, Some(new.start_time)));
            }
            if let Some(end) = new.end_time {
                if !period.ends_at_or_before(end) {
                    suffix = Some(period.slice(end, period.end_time));
                }
            }
        }
    }

    if new.user_id.is_some() {
        out.push(new);
    }
    out.extend(suffix);
    out.extend(tail);
    out
}
