//! Phase plans: the on-disk format, shape validation, and skeleton building.

pub mod model;
pub mod skeleton;

pub use model::{PhasePlan, PhaseRecord, PlanShapeError};
pub use skeleton::{PLACEHOLDER, build_skeleton};
