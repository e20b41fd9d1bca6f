//! Per-phase prompt construction.
//!
//! Renders a spec, the requested phase number, and a summary of the phases
//! already generated in this run into one instruction string. Pure logic:
//! the same inputs always produce the same prompt.

use crate::plan::PhaseRecord;
use crate::spec::{ArchitectureStyle, PhaseDuration, ProjectSpec, ScalingStrategy, StartingPoint};

/// A phase generated earlier in the current fill run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedPhase {
    pub id: u32,
    pub deliverable: String,
}

impl From<&PhaseRecord> for CompletedPhase {
    fn from(record: &PhaseRecord) -> Self {
        Self {
            id: record.id,
            deliverable: record.deliverable.clone(),
        }
    }
}

/// JSON shape the model must answer with.
const RESPONSE_CONTRACT: &str = r#"Return only valid JSON with this exact structure:
{
  "deliverable": "short description of what is produced",
  "tasks": ["task 1", "task 2", "task 3"],
  "commit_condition": "what must be true to consider this phase done",
  "example_input": "example of input at this phase",
  "example_output": "example of output at this phase"
}"#;

// ---------------------------------------------------------------------------
// Rendering helpers
// ---------------------------------------------------------------------------

/// Render the phases completed so far, one line each, or `"None yet."`.
pub fn prior_phases_summary(completed: &[CompletedPhase]) -> String {
    if completed.is_empty() {
        return "None yet.".to_owned();
    }
    completed
        .iter()
        .map(|p| format!("  Phase {}: {}", p.id, p.deliverable))
        .collect::<Vec<_>>()
        .join("\n")
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "None".to_owned()
    } else {
        items.join(", ")
    }
}

fn architecture_hint(style: ArchitectureStyle) -> &'static str {
    match style {
        ArchitectureStyle::Microservices => "independently deployable services",
        ArchitectureStyle::EventDriven => "components communicating through events",
        ArchitectureStyle::Serverless => "managed functions, no long-running servers",
        ArchitectureStyle::Other => "no specific pattern imposed",
    }
}

fn scaling_hint(strategy: ScalingStrategy) -> &'static str {
    match strategy {
        ScalingStrategy::None => "no scaling work planned",
        ScalingStrategy::Vertical => "scale by adding resources to one machine",
        ScalingStrategy::Horizontal => "scale by adding instances",
        ScalingStrategy::Serverless => "scaling handled by the platform",
        ScalingStrategy::Auto => "scale automatically with load",
    }
}

fn duration_hint(duration: PhaseDuration) -> &'static str {
    match duration {
        PhaseDuration::OneToTwoHours => "keep each phase to one or two hours of focused work",
        PhaseDuration::HalfDay => "size each phase for about half a working day",
        PhaseDuration::FullDay => "size each phase for a full working day",
        PhaseDuration::MultiDay => "a phase may span several days",
    }
}

fn starting_point_hint(start: StartingPoint) -> &'static str {
    match start {
        StartingPoint::Nothing => "starting from scratch; early phases include scaffolding",
        StartingPoint::Existing => "an existing codebase; early phases audit and extend it",
        StartingPoint::Prototype => "a prototype exists; early phases harden it",
        StartingPoint::Mvp => "an MVP exists; phases build on a working product",
    }
}

// ---------------------------------------------------------------------------
// Prompt construction
// ---------------------------------------------------------------------------

/// Build the instruction string requesting phase `phase_number`.
pub fn compile_prompt(
    spec: &ProjectSpec,
    phase_number: u32,
    completed: &[CompletedPhase],
) -> String {
    let mut prompt = String::with_capacity(2048);

    prompt.push_str("You are planning a software project phase by phase.\n\n");

    prompt.push_str(&format!("Project: {}\n", spec.name()));
    prompt.push_str(&format!("Description: {}\n", spec.description()));
    prompt.push_str(&format!("Main user: {}\n", spec.main_user()));
    prompt.push_str(&format!("Language: {}\n", spec.language()));
    prompt.push_str(&format!("Runtime: {}\n", spec.runtime()));

    let architecture = spec.architecture();
    prompt.push_str(&format!(
        "Architecture: {architecture} ({})\n",
        architecture_hint(architecture)
    ));
    if !spec.architecture_notes().is_empty() {
        prompt.push_str(&format!("Architecture notes: {}\n", spec.architecture_notes()));
    }

    let scaling = spec.scaling_strategy();
    prompt.push_str(&format!("Scaling strategy: {scaling} ({})\n", scaling_hint(scaling)));
    if !spec.expected_scale().is_empty() {
        prompt.push_str(&format!("Expected scale: {}\n", spec.expected_scale()));
    }

    let start = spec.starting_point();
    prompt.push_str(&format!("Starting point: {start} ({})\n", starting_point_hint(start)));

    prompt.push_str(&format!("Constraints: {}\n", join_or_none(spec.constraints())));
    prompt.push_str(&format!("Avoid: {}\n", join_or_none(spec.avoid())));

    let duration = spec.phase_duration();
    prompt.push_str(&format!("Phase duration: {duration} ({})\n", duration_hint(duration)));
    prompt.push_str(&format!("Total phases: {}\n", spec.phase_count()));
    prompt.push_str(&format!("Done when: {}\n\n", join_or_none(spec.done())));

    prompt.push_str("Phases completed so far:\n");
    prompt.push_str(&prior_phases_summary(completed));
    prompt.push_str("\n\n");

    prompt.push_str(&format!(
        "Now generate Phase {phase_number} of {}.\n\n",
        spec.phase_count()
    ));
    prompt.push_str(RESPONSE_CONTRACT);

    prompt
}
