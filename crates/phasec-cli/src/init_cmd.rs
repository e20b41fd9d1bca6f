//! `phasec init`: collect a project spec interactively and save it.

use std::io::{BufRead, Write};

use anyhow::{Context, Result, anyhow};
use tracing::info;

use phasec_core::{
    ArchitectureStyle, PhaseDuration, ProjectSpec, RawProjectSpec, ScalingStrategy, StartingPoint,
    Workspace,
};

use crate::interactive::Prompter;

const DEFAULT_PHASES: i64 = 7;

/// Run the questionnaire on stdin/stdout and write the spec to the workspace.
pub fn run_init(ws: &Workspace) -> Result<()> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut prompter = Prompter::new(stdin.lock(), stdout.lock());

    let spec = collect_spec(&mut prompter)?;

    prompter.say("\nProject spec:")?;
    prompter.say(&serde_json::to_string_pretty(&spec).context("failed to render spec")?)?;

    let path = ws.save_spec(&spec)?;
    info!(path = %path.display(), "spec written");
    Ok(())
}

/// Ask every spec question in order and validate the answers.
pub fn collect_spec<R: BufRead, W: Write>(p: &mut Prompter<R, W>) -> Result<ProjectSpec> {
    p.say("Starting phasec setup...")?;

    let name = p.required_text("What is the name of your project?")?;
    let description = p.required_text("Please provide a short description of your project")?;
    let main_user = p.text("Who is the main user of your project?", "Just Myself")?;
    let runtime = p.text("What is the runtime environment of your project?", "cli")?;
    let language = p.text("What is the programming language of your project?", "python")?;

    let min = i64::from(ProjectSpec::MIN_PHASES);
    let max = i64::from(ProjectSpec::MAX_PHASES);
    let phase_count = p.phase_count(
        &format!("How many phases does your project have? ({min}-{max})"),
        min..=max,
        DEFAULT_PHASES,
    )?;

    p.say("Enter 1+ completion conditions (what makes the project 'done'?):")?;
    let done = p.list("Condition", true)?;

    p.say("Enter any project constraints (optional):")?;
    let constraints = p.list("Constraint", false)?;

    p.say("\n--- Architecture ---")?;
    let architecture = p.choice("Architecture style", ArchitectureStyle::Other)?;
    let architecture_notes = p.text(
        "Any extra architecture notes? (frameworks, layers, patterns; leave blank to skip)",
        "",
    )?;

    p.say("\n--- Scaling ---")?;
    let scaling_strategy = p.choice("Scaling strategy", ScalingStrategy::None)?;
    let expected_scale = p.text(
        "Expected scale / load description (e.g. 'single user', '10k daily requests'; leave blank to skip)",
        "",
    )?;

    p.say("\n--- Things to avoid ---")?;
    p.say("List technologies, libraries, patterns, or practices to avoid:")?;
    let avoid = p.list("Avoid", false)?;

    p.say("\n--- Phase generation ---")?;
    let phase_duration = p.choice(
        "Target duration per phase (used to scope each phase's workload)",
        PhaseDuration::HalfDay,
    )?;
    let starting_point = p.choice(
        "Starting point (shapes what the first phases look like)",
        StartingPoint::Nothing,
    )?;

    let raw = RawProjectSpec {
        name: Some(name),
        description: Some(description),
        main_user: Some(main_user),
        runtime: Some(runtime),
        language: Some(language),
        phase_count: Some(phase_count),
        done: Some(done),
        constraints: Some(constraints),
        architecture: Some(architecture.to_string()),
        architecture_notes: Some(architecture_notes),
        scaling_strategy: Some(scaling_strategy.to_string()),
        expected_scale: Some(expected_scale),
        avoid: Some(avoid),
        phase_duration: Some(phase_duration.to_string()),
        starting_point: Some(starting_point.to_string()),
    };

    ProjectSpec::validate(raw).map_err(|e| anyhow!("Spec validation failed: {e}"))
}
