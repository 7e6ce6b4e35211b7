//! Résolution des rotations : heures murales, restrictions, fusion des
//! périodes et des couches.

mod clock;
mod coalesce;
mod layer;
mod merge;
mod restrictions;
mod types;

pub use clock::{resolve, resolve_str};
pub use coalesce::coalesce_rotation_period;
pub use layer::LayerRotation;
pub use merge::{coalesce_schedule_layers, determine_schedule_oncall};
pub use restrictions::invert_daily_restrictions;
pub use types::RotationError;
