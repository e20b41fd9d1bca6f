use crate::spec::ProjectSpec;

use super::model::{PhasePlan, PhaseRecord};

/// Value held by every text field of an unfilled phase.
pub const PLACEHOLDER: &str = "TBD";

/// Build an empty plan with one placeholder record per phase.
pub fn build_skeleton(spec: &ProjectSpec) -> PhasePlan {
    let phases = (1..=spec.phase_count())
        .map(|id| PhaseRecord {
            id,
            title: format!("Phase {id}"),
            deliverable: PLACEHOLDER.to_owned(),
            tasks: Vec::new(),
            commit_condition: PLACEHOLDER.to_owned(),
            example_input: PLACEHOLDER.to_owned(),
            example_output: PLACEHOLDER.to_owned(),
        })
        .collect();
    PhasePlan { phases }
}
