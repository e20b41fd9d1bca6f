//! `phasec fill`: populate the workspace plan with model-generated phases.

use anyhow::{Context, Result};
use tracing::{info, warn};

use phasec_core::{
    FillOptions, FillOutcome, Generator, GeneratorConfig, PhasePlan, Workspace, create_generator,
    fill_plan,
};

/// Build the configured generator and fill the workspace plan with it.
pub async fn run_fill(ws: &Workspace, config: &GeneratorConfig) -> Result<()> {
    let generator = create_generator(config).context("failed to set up generator")?;
    info!(provider = %config.provider, model = %config.model, "using generator");

    let (plan, _) = fill_workspace(ws, generator.as_ref(), &FillOptions::default()).await?;

    println!(
        "{}",
        serde_json::to_string_pretty(&plan).context("failed to render plan")?
    );
    Ok(())
}

/// Fill the workspace plan and save it, even when the run stops early.
pub async fn fill_workspace(
    ws: &Workspace,
    generator: &dyn Generator,
    options: &FillOptions,
) -> Result<(PhasePlan, FillOutcome)> {
    let spec = ws.load_spec(&ws.spec_path()).context("failed to load spec")?;
    let mut plan = ws
        .load_plan()
        .context("failed to load plan; run `phasec compile` first")?;

    let result = fill_plan(&spec, &mut plan, generator, options).await;

    let path = ws.save_plan(&plan)?;
    match result {
        Ok(outcome) => {
            info!(
                path = %path.display(),
                filled = outcome.filled,
                elapsed_secs = outcome.elapsed.as_secs_f64(),
                "plan filled"
            );
            Ok((plan, outcome))
        }
        Err(e) => {
            warn!(path = %path.display(), "fill stopped early; partial plan saved");
            Err(e).with_context(|| {
                format!("fill stopped; partial plan saved to {}", path.display())
            })
        }
    }
}
