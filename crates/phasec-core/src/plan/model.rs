//! Plan document types.
//!
//! These types map directly to the `plan.json` on-disk format:
//!
//! ```json
//! {"phases": [{"id": 1, "title": "Phase 1", "deliverable": "TBD", "tasks": [],
//!              "commit_condition": "TBD", "example_input": "TBD", "example_output": "TBD"}]}
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::normalize::ParsedPhaseFields;

/// One unit of project work.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhaseRecord {
    /// 1-based position in the plan.
    pub id: u32,
    pub title: String,
    /// Short description of what the phase produces.
    pub deliverable: String,
    pub tasks: Vec<String>,
    /// What must be true to consider the phase done.
    pub commit_condition: String,
    pub example_input: String,
    pub example_output: String,
}

impl PhaseRecord {
    /// Overwrite this record's content with the fields a model returned.
    ///
    /// Fields the model left out keep their current value.
    pub fn merge(&mut self, fields: ParsedPhaseFields) {
        let ParsedPhaseFields {
            deliverable,
            tasks,
            commit_condition,
            example_input,
            example_output,
        } = fields;

        merge_field(self.id, "deliverable", &mut self.deliverable, deliverable);
        merge_field(self.id, "tasks", &mut self.tasks, tasks);
        merge_field(self.id, "commit_condition", &mut self.commit_condition, commit_condition);
        merge_field(self.id, "example_input", &mut self.example_input, example_input);
        merge_field(self.id, "example_output", &mut self.example_output, example_output);
    }
}

fn merge_field<T>(phase: u32, field: &str, slot: &mut T, value: Option<T>) {
    match value {
        Some(v) => *slot = v,
        None => warn!(phase, field, "response omitted field; keeping previous value"),
    }
}

/// Shape errors in a plan document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanShapeError {
    #[error("plan must contain at least one phase")]
    Empty,

    #[error("phase at position {position} has id {found}, expected {position}")]
    NonContiguousId { position: u32, found: u32 },
}

/// Ordered collection of phase records with ids `1..=len`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhasePlan {
    pub phases: Vec<PhaseRecord>,
}

impl PhasePlan {
    /// Number of phases.
    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    /// Check that ids are dense and ascending, starting at 1.
    pub fn validate(&self) -> Result<(), PlanShapeError> {
        if self.phases.is_empty() {
            return Err(PlanShapeError::Empty);
        }
        for (position, phase) in (1u32..).zip(&self.phases) {
            if phase.id != position {
                return Err(PlanShapeError::NonContiguousId {
                    position,
                    found: phase.id,
                });
            }
        }
        Ok(())
    }
}
