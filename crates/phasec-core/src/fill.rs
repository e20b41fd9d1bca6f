//! Sequential plan filling.
//!
//! [`fill_plan`] walks a plan's records in ascending id order. For each one
//! it compiles a prompt (including a summary of the phases filled so far in
//! this run), awaits the generator, normalizes the answer, and merges it into
//! the record in place. The first failure stops the walk; records already
//! filled keep their new values, later records keep their placeholders.

use std::time::{Duration, Instant};

use futures::stream::{self, TryStreamExt};
use thiserror::Error;
use tracing::{debug, info};

use crate::generate::{GenerateError, Generator};
use crate::normalize::{MalformedResponse, normalize};
use crate::plan::{PhasePlan, PhaseRecord};
use crate::prompt::{CompletedPhase, compile_prompt};
use crate::spec::ProjectSpec;

/// Default minimum time between progress messages.
pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_secs(5);

/// Tunables for a fill run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillOptions {
    pub progress_interval: Duration,
}

impl Default for FillOptions {
    fn default() -> Self {
        Self {
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

/// Summary of a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillOutcome {
    pub filled: usize,
    pub elapsed: Duration,
}

/// Why a fill run stopped.
#[derive(Debug, Error)]
pub enum FillError {
    #[error("plan has {actual} phases but the spec asks for {expected}")]
    PlanMismatch { expected: u32, actual: usize },

    #[error("generation failed for phase {phase}")]
    Backend {
        phase: u32,
        #[source]
        source: GenerateError,
    },

    #[error(transparent)]
    Malformed(#[from] MalformedResponse),
}

impl FillError {
    /// Phase the run stopped at, if it got that far.
    pub fn phase(&self) -> Option<u32> {
        match self {
            Self::PlanMismatch { .. } => None,
            Self::Backend { phase, .. } => Some(*phase),
            Self::Malformed(e) => Some(e.phase),
        }
    }
}

// ---------------------------------------------------------------------------
// Progress throttle
// ---------------------------------------------------------------------------

/// Rate limiter for progress messages.
#[derive(Debug)]
pub(crate) struct ProgressThrottle {
    interval: Duration,
    last: Instant,
}

impl ProgressThrottle {
    pub(crate) fn new(interval: Duration, started: Instant) -> Self {
        Self {
            interval,
            last: started,
        }
    }

    /// Whether a message is due at `now`; resets the clock when it is.
    pub(crate) fn tick(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last) >= self.interval {
            self.last = now;
            true
        } else {
            false
        }
    }
}

struct FillState {
    completed: Vec<CompletedPhase>,
    throttle: ProgressThrottle,
}

// ---------------------------------------------------------------------------
// Orchestration
// ---------------------------------------------------------------------------

/// Fill every record of `plan` using `generator`.
///
/// `plan` must have exactly `spec.phase_count()` records. On error the plan
/// holds whatever was merged before the failing phase.
pub async fn fill_plan(
    spec: &ProjectSpec,
    plan: &mut PhasePlan,
    generator: &dyn Generator,
    options: &FillOptions,
) -> Result<FillOutcome, FillError> {
    let total = spec.phase_count();
    if plan.len() != total as usize {
        return Err(FillError::PlanMismatch {
            expected: total,
            actual: plan.len(),
        });
    }

    let started = Instant::now();
    info!(total, backend = generator.name(), "filling plan");

    let initial = FillState {
        completed: Vec::with_capacity(plan.len()),
        throttle: ProgressThrottle::new(options.progress_interval, started),
    };

    let state = stream::iter(plan.phases.iter_mut().map(Ok::<_, FillError>))
        .try_fold(initial, move |mut state, record| async move {
            if state.throttle.tick(Instant::now()) {
                info!("processing phase {} of {total}", record.id);
            }
            fill_phase(spec, record, generator, &state.completed).await?;
            state.completed.push(CompletedPhase::from(&*record));
            Ok::<_, FillError>(state)
        })
        .await?;

    let outcome = FillOutcome {
        filled: state.completed.len(),
        elapsed: started.elapsed(),
    };
    info!(filled = outcome.filled, elapsed_ms = outcome.elapsed.as_millis() as u64, "plan filled");
    Ok(outcome)
}

async fn fill_phase(
    spec: &ProjectSpec,
    record: &mut PhaseRecord,
    generator: &dyn Generator,
    completed: &[CompletedPhase],
) -> Result<(), FillError> {
    let phase = record.id;
    let prompt = compile_prompt(spec, phase, completed);
    debug!(phase, prompt_len = prompt.len(), "requesting phase");

    let raw = generator
        .generate(&prompt)
        .await
        .map_err(|source| FillError::Backend { phase, source })?;
    debug!(phase, response_len = raw.len(), "received response");

    let fields = normalize(phase, &raw)?;
    record.merge(fields);
    Ok(())
}
