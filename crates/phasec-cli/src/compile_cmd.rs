//! `phasec compile [PATH]`: validate a spec and write the plan skeleton.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::info;

use phasec_core::{PhasePlan, StoreError, Workspace, build_skeleton};

/// Load the spec at `path` (or the workspace spec), build the skeleton,
/// print it, and save it as the workspace plan.
pub fn run_compile(ws: &Workspace, path: Option<&Path>) -> Result<()> {
    let stdout = std::io::stdout();
    compile(ws, path, &mut stdout.lock())?;
    Ok(())
}

/// Success is reported as soon as the spec validates; the plan is printed
/// before it is saved.
fn compile(ws: &Workspace, path: Option<&Path>, out: &mut impl Write) -> Result<PhasePlan> {
    let path = path.map_or_else(|| ws.spec_path(), Path::to_path_buf);

    let spec = match ws.load_spec(&path) {
        Ok(spec) => spec,
        Err(StoreError::InvalidSpec { source, .. }) => bail!("Spec validation failed: {source}"),
        Err(e) => return Err(e).context("failed to load spec"),
    };
    writeln!(out, "Compilation successful.")?;

    let plan = build_skeleton(&spec);
    let rendered = serde_json::to_string_pretty(&plan).context("failed to render plan")?;
    writeln!(out, "{rendered}")?;

    let written = ws.save_plan(&plan)?;
    info!(path = %written.display(), phases = plan.len(), "plan skeleton written");
    Ok(plan)
}
