use super::coalesce::coalesce_rotation_period;
use super::layer::LayerRotation;
use super::RotationError;
use crate::model::{RotationPeriod, RotationSchedule, ScheduleLayer, UserId};
use chrono::{DateTime, Utc};

/// Aplatis les couches sur `[start, end]` en une seule chronologie.
///
/// Les couches sont appliquées par `precedence` croissante (tri stable) :
/// la dernière appliquée l'emporte là où elle a quelqu'un d'assigné.
/// Le résultat peut déborder de la fenêtre demandée.
pub fn coalesce_schedule_layers(
    layers: &[ScheduleLayer],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<RotationPeriod>, RotationError> {
    if end < start {
        return Err(RotationError::InvalidTimeRange);
    }

    let mut ordered: Vec<&ScheduleLayer> = layers.iter().collect();
    ordered.sort_by_key(|l| l.precedence);

    let mut schedule = Vec::new();
    for layer in ordered {
        let mut rotation = LayerRotation::new(layer)?;
        rotation.fast_forward_to(start);
        for period in rotation {
            if period.start_time > end {
                break;
            }
            schedule = coalesce_rotation_period(schedule, period);
        }
        #[cfg(feature = "logging")]
        tracing::debug!(layer = %layer.name, periods = schedule.len(), "layer merged");
    }
    Ok(schedule)
}

/// Qui est d'astreinte à `time` (maintenant par défaut) ; `None` si personne.
pub fn determine_schedule_oncall(
    schedule: &RotationSchedule,
    time: Option<DateTime<Utc>>,
) -> Result<Option<UserId>, RotationError> {
    let time = time.unwrap_or_else(Utc::now);
    let periods = coalesce_schedule_layers(&schedule.layers, time, time)?;
    Ok(periods
        .into_iter()
        .find(|p| p.contains(time))
        .and_then(|p| p.user_id))
}

impl RotationSchedule {
    pub fn oncall_at(&self, time: DateTime<Utc>) -> Result<Option<UserId>, RotationError> {
        determine_schedule_oncall(self, Some(time))
    }

    pub fn periods_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<RotationPeriod>, RotationError> {
        coalesce_schedule_layers(&self.layers, start, end)
    }
}
