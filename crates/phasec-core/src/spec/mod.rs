//! Project spec: the validated description of a project to be planned.

pub mod model;
pub mod validate;

pub use model::{
    ArchitectureStyle, ClosedSet, PhaseDuration, ProjectSpec, ScalingStrategy, StartingPoint,
    UnknownVariant,
};
pub use validate::{RawProjectSpec, SpecDocumentError, SpecValidationError, Violation};
