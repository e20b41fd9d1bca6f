//! Core library for phasec: spec validation, plan compilation, and
//! LLM-driven plan filling.
//!
//! ```text
//! ProjectSpec --build_skeleton--> PhasePlan (TBD placeholders)
//!                                     |
//!                                     v
//!                fill_plan: for each phase, ascending
//!                  compile_prompt -> Generator::generate -> normalize -> merge
//! ```

pub mod fill;
pub mod generate;
pub mod normalize;
pub mod plan;
pub mod prompt;
pub mod spec;
pub mod store;

pub use fill::{FillError, FillOptions, FillOutcome, fill_plan};
pub use generate::{
    AnthropicGenerator, GenerateError, Generator, GeneratorConfig, OpenAiGenerator, Provider,
    ProviderParseError, create_generator,
};
pub use normalize::{
    MalformedReason, MalformedResponse, ParsedPhaseFields, normalize, strip_code_fences,
};
pub use plan::{PLACEHOLDER, PhasePlan, PhaseRecord, PlanShapeError, build_skeleton};
pub use prompt::{CompletedPhase, compile_prompt, prior_phases_summary};
pub use spec::{
    ArchitectureStyle, ClosedSet, PhaseDuration, ProjectSpec, RawProjectSpec, ScalingStrategy,
    SpecDocumentError, SpecValidationError, StartingPoint, UnknownVariant, Violation,
};
pub use store::{StoreError, Workspace};
