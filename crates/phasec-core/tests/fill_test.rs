//! Integration tests for the fill pipeline.
//!
//! The generator is a scripted double, so each test controls exactly what
//! the "model" answers for every phase.

use std::time::Duration;

use phasec_core::{
    FillError, FillOptions, GenerateError, MalformedReason, PLACEHOLDER, build_skeleton,
    fill_plan,
};
use phasec_test_utils::{ScriptedGenerator, fenced_phase_response, sample_spec};

fn quiet() -> FillOptions {
    FillOptions {
        progress_interval: Duration::from_secs(3600),
    }
}

// -----------------------------------------------------------------------
// Successful runs
// -----------------------------------------------------------------------

#[tokio::test]
async fn fills_every_phase_in_order() {
    let spec = sample_spec(7);
    let mut plan = build_skeleton(&spec);
    let generator = ScriptedGenerator::from_texts((1..=7).map(fenced_phase_response));

    let outcome = fill_plan(&spec, &mut plan, &generator, &quiet()).await.unwrap();

    assert_eq!(outcome.filled, 7);
    assert_eq!(generator.calls(), 7);
    for (n, phase) in (1u32..).zip(&plan.phases) {
        assert_eq!(phase.id, n);
        assert_eq!(phase.title, format!("Phase {n}"));
        assert_eq!(phase.deliverable, format!("D{n}"));
        assert_eq!(phase.tasks, vec!["t1".to_owned()]);
        assert_eq!(phase.commit_condition, format!("C{n}"));
        assert_eq!(phase.example_input, format!("I{n}"));
        assert_eq!(phase.example_output, format!("O{n}"));
    }
}

#[tokio::test]
async fn prompts_summarize_phases_filled_so_far() {
    let spec = sample_spec(6);
    let mut plan = build_skeleton(&spec);
    let generator = ScriptedGenerator::from_texts((1..=6).map(fenced_phase_response));

    fill_plan(&spec, &mut plan, &generator, &quiet()).await.unwrap();

    let prompts = generator.prompts();
    assert_eq!(prompts.len(), 6);
    assert!(prompts[0].contains("None yet."));
    assert!(prompts[0].contains("Now generate Phase 1 of 6."));
    assert!(prompts[2].contains("  Phase 1: D1\n  Phase 2: D2"));
    assert!(!prompts[2].contains("Phase 3: D3"));
    assert!(prompts[5].contains("  Phase 5: D5"));
    assert!(prompts[5].contains("Now generate Phase 6 of 6."));
}

#[tokio::test]
async fn partial_answers_keep_placeholders() {
    let spec = sample_spec(6);
    let mut plan = build_skeleton(&spec);
    let mut answers: Vec<String> = (1..=6).map(fenced_phase_response).collect();
    answers[1] = r#"{"deliverable": "only a deliverable"}"#.to_owned();
    let generator = ScriptedGenerator::from_texts(answers);

    fill_plan(&spec, &mut plan, &generator, &quiet()).await.unwrap();

    let second = &plan.phases[1];
    assert_eq!(second.deliverable, "only a deliverable");
    assert_eq!(second.commit_condition, PLACEHOLDER);
    assert!(second.tasks.is_empty());
}

#[tokio::test]
async fn progress_interval_does_not_change_results() {
    let spec = sample_spec(6);
    let mut plan = build_skeleton(&spec);
    let generator = ScriptedGenerator::from_texts((1..=6).map(fenced_phase_response));
    let options = FillOptions {
        progress_interval: Duration::ZERO,
    };

    let outcome = fill_plan(&spec, &mut plan, &generator, &options).await.unwrap();
    assert_eq!(outcome.filled, 6);
    assert_eq!(plan.phases[5].deliverable, "D6");
}

// -----------------------------------------------------------------------
// Failures
// -----------------------------------------------------------------------

#[tokio::test]
async fn empty_response_aborts_and_keeps_earlier_phases() {
    let spec = sample_spec(6);
    let mut plan = build_skeleton(&spec);
    let generator = ScriptedGenerator::from_texts([
        fenced_phase_response(1),
        fenced_phase_response(2),
        String::new(),
        fenced_phase_response(4),
    ]);

    let err = fill_plan(&spec, &mut plan, &generator, &quiet())
        .await
        .unwrap_err();

    match err {
        FillError::Malformed(m) => {
            assert_eq!(m.phase, 3);
            assert!(matches!(m.reason, MalformedReason::Empty));
        }
        other => panic!("expected malformed response, got {other:?}"),
    }
    assert_eq!(generator.calls(), 3);

    assert_eq!(plan.phases[0].deliverable, "D1");
    assert_eq!(plan.phases[1].deliverable, "D2");
    for phase in &plan.phases[2..] {
        assert_eq!(phase.deliverable, PLACEHOLDER);
        assert_eq!(phase.commit_condition, PLACEHOLDER);
        assert_eq!(phase.example_input, PLACEHOLDER);
        assert_eq!(phase.example_output, PLACEHOLDER);
        assert!(phase.tasks.is_empty());
    }
}

#[tokio::test]
async fn prose_response_is_malformed() {
    let spec = sample_spec(6);
    let mut plan = build_skeleton(&spec);
    let generator = ScriptedGenerator::from_texts(["Sure! Here is phase 1: build the thing."]);

    let err = fill_plan(&spec, &mut plan, &generator, &quiet())
        .await
        .unwrap_err();

    assert_eq!(err.phase(), Some(1));
    assert!(matches!(
        err,
        FillError::Malformed(ref m) if matches!(m.reason, MalformedReason::Json(_))
    ));
}

#[tokio::test]
async fn backend_error_aborts_with_phase() {
    let spec = sample_spec(6);
    let mut plan = build_skeleton(&spec);
    let generator = ScriptedGenerator::new(vec![
        Ok(fenced_phase_response(1)),
        Err(GenerateError::Api {
            status: 529,
            message: "overloaded".to_owned(),
        }),
    ]);

    let err = fill_plan(&spec, &mut plan, &generator, &quiet())
        .await
        .unwrap_err();

    match err {
        FillError::Backend {
            phase,
            source: GenerateError::Api { status, .. },
        } => {
            assert_eq!(phase, 2);
            assert_eq!(status, 529);
        }
        other => panic!("expected backend error, got {other:?}"),
    }
    assert_eq!(plan.phases[0].deliverable, "D1");
    assert_eq!(plan.phases[1].deliverable, PLACEHOLDER);
}

#[tokio::test]
async fn plan_length_must_match_spec() {
    let spec = sample_spec(7);
    let mut plan = build_skeleton(&sample_spec(6));
    let generator = ScriptedGenerator::from_texts((1..=7).map(fenced_phase_response));

    let err = fill_plan(&spec, &mut plan, &generator, &quiet())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        FillError::PlanMismatch {
            expected: 7,
            actual: 6
        }
    ));
    assert_eq!(generator.calls(), 0);
}
