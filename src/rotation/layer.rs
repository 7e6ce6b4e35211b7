use super::clock::resolve;
use super::coalesce::coalesce_rotation_period;
use super::restrictions::invert_daily_restrictions;
use super::RotationError;
use crate::model::{RotationPeriod, ScheduleLayer};
use chrono::{DateTime, Days, Duration, NaiveDate, Utc};
use std::collections::VecDeque;

/// Au-delà d'une semaine entièrement vide, la couche ne produira plus rien :
/// les restrictions se répètent chaque semaine.
const BLANK_WEEK_DAYS: i64 = 7;

/// Suite infinie des périodes d'une couche, restrictions appliquées.
///
/// Un bloc brut `[relève, relève + cadence)` peut donner zéro ou plusieurs
/// périodes une fois les restrictions retirées ; le surplus attend dans
/// `buffer`. La suite ne s'arrête que si les restrictions vident toute la
/// semaine, ou au bout du calendrier représentable.
#[derive(Debug)]
pub struct LayerRotation<'a> {
    layer: &'a ScheduleLayer,
    rotation_days: Days,
    current_date: NaiveDate,
    index: usize,
    buffer: VecDeque<RotationPeriod>,
    exhausted: bool,
}

impl<'a> LayerRotation<'a> {
    pub fn new(layer: &'a ScheduleLayer) -> Result<Self, RotationError> {
        if layer.user_ids.is_empty() {
            return Err(RotationError::Configuration(format!(
                "layer {} has no users in its rotation",
                layer.name
            )));
        }
        let days = layer.rotation.days();
        if days == 0 {
            return Err(RotationError::Configuration(format!(
                "layer {} has a zero-day rotation",
                layer.name
            )));
        }
        Ok(Self {
            layer,
            rotation_days: Days::new(days),
            current_date: layer.start_date,
            index: 0,
            buffer: VecDeque::new(),
            exhausted: false,
        })
    }

    /// Avance jusqu'à la première période qui se termine après `time` ; elle
    /// devient la prochaine valeur renvoyée par `next()`.
    pub fn fast_forward_to(&mut self, time: DateTime<Utc>) {
        while let Some(period) = self.buffer.pop_front() {
            if !period.ends_at_or_before(time) {
                self.buffer.push_front(period);
                return;
            }
        }

        // les blocs bruts finis avant `time` ne peuvent rien produire d'utile
        while !self.exhausted {
            match self.raw_block_bounds() {
                Ok((_, end_date, end)) if end <= time => {
                    self.advance(end_date);
                }
                Ok(_) => break,
                Err(_err) => {
                    #[cfg(feature = "logging")]
                    tracing::warn!(layer = %self.layer.name, error = %_err, "rotation stopped");
                    self.exhausted = true;
                }
            }
        }

        while let Some(period) = self.next() {
            if !period.ends_at_or_before(time) {
                self.buffer.push_front(period);
                return;
            }
        }
    }

    fn raw_block_bounds(&self) -> Result<(DateTime<Utc>, NaiveDate, DateTime<Utc>), RotationError> {
        let handoff = self.layer.handoff_time;
        let start = resolve(self.current_date, handoff)?;
        let end_date = self
            .current_date
            .checked_add_days(self.rotation_days)
            .ok_or(RotationError::OutOfRange(self.current_date))?;
        let end = resolve(end_date, handoff)?;
        Ok((start, end_date, end))
    }

    fn advance(&mut self, end_date: NaiveDate) {
        self.current_date = end_date;
        self.index = (self.index + 1) % self.layer.user_ids.len();
    }

    /// Calcule le bloc courant, restrictions appliquées, puis avance d'un cran.
    fn next_block(
        &mut self,
    ) -> Result<(DateTime<Utc>, DateTime<Utc>, Vec<RotationPeriod>), RotationError> {
        let (start, end_date, end) = self.raw_block_bounds()?;
        let user = self.layer.user_ids[self.index].clone();
        let mut periods = vec![RotationPeriod::assigned(start, end, user)];

        let mut day = self.current_date;
        while day <= end_date {
            for gap in invert_daily_restrictions(day, &self.layer.restrictions)? {
                periods = coalesce_rotation_period(periods, gap);
            }
            day = day.succ_opt().ok_or(RotationError::OutOfRange(day))?;
        }

        #[cfg(feature = "logging")]
        tracing::trace!(
            layer = %self.layer.name,
            %start,
            %end,
            pieces = periods.len(),
            "rotation block"
        );

        self.advance(end_date);
        Ok((start, end, periods))
    }
}

impl Iterator for LayerRotation<'_> {
    type Item = RotationPeriod;

    fn next(&mut self) -> Option<RotationPeriod> {
        let mut blank_since: Option<DateTime<Utc>> = None;
        while self.buffer.is_empty() {
            if self.exhausted {
                return None;
            }
            match self.next_block() {
                Ok((start, end, periods)) if periods.is_empty() => {
                    let since = *blank_since.get_or_insert(start);
                    if end - since >= Duration::days(BLANK_WEEK_DAYS) {
                        #[cfg(feature = "logging")]
                        tracing::debug!(layer = %self.layer.name, "restrictions leave no coverage");
                        self.exhausted = true;
                    }
                }
                Ok((_, _, periods)) => self.buffer.extend(periods),
                Err(_err) => {
                    #[cfg(feature = "logging")]
                    tracing::warn!(layer = %self.layer.name, error = %_err, "rotation stopped");
                    self.exhausted = true;
                }
            }
        }
        self.buffer.pop_front()
    }
}
