//! Shared test utilities for phasec integration tests.
//!
//! Provides a scripted [`Generator`] double and spec fixtures so fill and
//! CLI tests run without a network or an API key.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use phasec_core::{GenerateError, Generator, ProjectSpec, RawProjectSpec};

/// A generator that replays scripted responses in order.
///
/// Every prompt it receives is recorded. Once the script runs out, further
/// calls fail with [`GenerateError::InvalidResponse`].
pub struct ScriptedGenerator {
    responses: Mutex<VecDeque<Result<String, GenerateError>>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl ScriptedGenerator {
    pub fn new(responses: Vec<Result<String, GenerateError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// A generator that answers every call successfully with `texts`, in order.
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(texts.into_iter().map(|t| Ok(t.into())).collect())
    }

    /// Number of `generate` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_owned());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GenerateError::InvalidResponse("script exhausted".to_owned())))
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A minimal valid spec document with the given phase count.
pub fn base_spec_json(phase_count: i64) -> serde_json::Value {
    serde_json::json!({
        "name": "Ledger",
        "description": "Personal finance tracker",
        "main_user": "Just Myself",
        "runtime": "cli",
        "phase_count": phase_count,
        "done": ["imports CSV", "reports monthly totals"],
    })
}

/// Unvalidated fields matching [`base_spec_json`].
pub fn sample_raw_spec(phase_count: i64) -> RawProjectSpec {
    RawProjectSpec {
        name: Some("Ledger".into()),
        description: Some("Personal finance tracker".into()),
        main_user: Some("Just Myself".into()),
        runtime: Some("cli".into()),
        phase_count: Some(phase_count),
        done: Some(vec!["imports CSV".into(), "reports monthly totals".into()]),
        ..Default::default()
    }
}

/// A validated spec with `phase_count` phases.
///
/// # Panics
///
/// Panics if `phase_count` is outside the accepted range.
pub fn sample_spec(phase_count: i64) -> ProjectSpec {
    ProjectSpec::validate(sample_raw_spec(phase_count)).expect("sample spec must be valid")
}

/// A fenced JSON answer for phase `n`: `D{n}`, `["t1"]`, `C{n}`, `I{n}`, `O{n}`.
pub fn fenced_phase_response(n: u32) -> String {
    let body = serde_json::json!({
        "deliverable": format!("D{n}"),
        "tasks": ["t1"],
        "commit_condition": format!("C{n}"),
        "example_input": format!("I{n}"),
        "example_output": format!("O{n}"),
    });
    format!("```json\n{body}\n```")
}
