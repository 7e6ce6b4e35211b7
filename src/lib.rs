#![forbid(unsafe_code)]
//! Relève — calcul d'astreinte à partir de rotations superposées (sans BD).
//!
//! - Couches de rotation round-robin, relève à heure fixe.
//! - Restrictions horaires par jour de semaine.
//! - Fusion des couches par précédence ; « qui est d'astreinte maintenant ».
//! - Tout en UTC ; stockage fichier JSON, export JSON/CSV.

pub mod io;
pub mod model;
pub mod notification;
pub mod rotation;
pub mod storage;

pub use model::{
    ClockTime, DailyRestrictions, LayerId, Member, RestrictionWindow, RotationPeriod,
    RotationSchedule, RotationType, ScheduleId, ScheduleLayer, UserId,
};
pub use notification::{prepare_handoff_notice, HandoffNotice, NoticeRenderer, TextNotice};
pub use rotation::{
    coalesce_rotation_period, coalesce_schedule_layers, determine_schedule_oncall,
    invert_daily_restrictions, resolve, resolve_str, LayerRotation, RotationError,
};
pub use storage::{JsonStorage, Storage};
