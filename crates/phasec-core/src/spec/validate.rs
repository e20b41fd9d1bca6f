//! Construction-time validation for [`ProjectSpec`].
//!
//! Untrusted input (a spec document on disk, answers from `phasec init`) is
//! first decoded into a [`RawProjectSpec`] whose fields are all optional, then
//! checked in a single pass. Every violated constraint is reported, not just
//! the first one:
//! - required fields are present,
//! - text fields respect their length bounds,
//! - `phase_count` is within 6..=12,
//! - enumeration fields hold a member of their closed set.

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

use super::model::{
    ArchitectureStyle, ClosedSet, PhaseDuration, ProjectSpec, ScalingStrategy, StartingPoint,
};

const NAME_MAX: usize = 50;
const DESCRIPTION_MAX: usize = 1000;
const ARCHITECTURE_NOTES_MAX: usize = 500;
const EXPECTED_SCALE_MAX: usize = 200;
const DEFAULT_LANGUAGE: &str = "python";

/// Unvalidated spec fields, as read from a document or collected interactively.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawProjectSpec {
    pub name: Option<String>,
    pub description: Option<String>,
    pub main_user: Option<String>,
    pub runtime: Option<String>,
    pub language: Option<String>,
    pub phase_count: Option<i64>,
    pub done: Option<Vec<String>>,
    pub constraints: Option<Vec<String>>,
    pub architecture: Option<String>,
    pub architecture_notes: Option<String>,
    pub scaling_strategy: Option<String>,
    pub expected_scale: Option<String>,
    pub avoid: Option<Vec<String>>,
    pub phase_duration: Option<String>,
    pub starting_point: Option<String>,
}

/// A single violated field constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Field name as it appears in the spec document, or `document` for
    /// errors that cannot be attributed to one field.
    pub field: String,
    pub reason: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// The spec failed validation. Carries every violation found.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", join_violations(.violations))]
pub struct SpecValidationError {
    pub violations: Vec<Violation>,
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(Violation::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl SpecValidationError {
    /// Whether any violation concerns `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

// ---------------------------------------------------------------------------
// Field checks
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Checker {
    violations: Vec<Violation>,
}

impl Checker {
    fn push(&mut self, field: &str, reason: impl Into<String>) {
        self.violations.push(Violation {
            field: field.to_owned(),
            reason: reason.into(),
        });
    }

    fn required<T>(&mut self, field: &str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.push(field, "field required");
        }
        value
    }

    /// Check a text value against inclusive character-count bounds.
    fn length(
        &mut self,
        field: &str,
        value: Option<String>,
        min: usize,
        max: usize,
    ) -> Option<String> {
        let value = value?;
        let len = value.chars().count();
        if len < min {
            self.push(field, format!("must have at least {min} character(s), got {len}"));
            None
        } else if len > max {
            self.push(field, format!("must have at most {max} characters, got {len}"));
            None
        } else {
            Some(value)
        }
    }

    fn phase_count(&mut self, value: Option<i64>) -> Option<u32> {
        let n = self.required("phase_count", value)?;
        let range = i64::from(ProjectSpec::MIN_PHASES)..=i64::from(ProjectSpec::MAX_PHASES);
        if range.contains(&n) {
            u32::try_from(n).ok()
        } else {
            self.push(
                "phase_count",
                format!(
                    "must be between {} and {}, got {n}",
                    ProjectSpec::MIN_PHASES,
                    ProjectSpec::MAX_PHASES
                ),
            );
            None
        }
    }

    /// Parse an enumeration field, falling back to `default` when absent.
    fn choice<T: ClosedSet>(&mut self, value: Option<String>, default: T) -> T {
        match value {
            None => default,
            Some(s) => match s.parse::<T>() {
                Ok(v) => v,
                Err(e) => {
                    self.push(T::FIELD, format!("{:?} is not one of: {}", e.value, e.expected));
                    default
                }
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl ProjectSpec {
    pub const MIN_PHASES: u32 = 6;
    pub const MAX_PHASES: u32 = 12;

    /// Validate a raw spec in one pass and build a [`ProjectSpec`].
    pub fn validate(raw: RawProjectSpec) -> Result<Self, SpecValidationError> {
        let mut c = Checker::default();

        let name = c.required("name", raw.name);
        let name = c.length("name", name, 1, NAME_MAX);
        let description = c.required("description", raw.description);
        let description = c.length("description", description, 1, DESCRIPTION_MAX);
        let main_user = c.required("main_user", raw.main_user);
        let runtime = c.required("runtime", raw.runtime);
        let phase_count = c.phase_count(raw.phase_count);
        let done = c.required("done", raw.done);

        let architecture_notes = c.length(
            "architecture_notes",
            Some(raw.architecture_notes.unwrap_or_default()),
            0,
            ARCHITECTURE_NOTES_MAX,
        );
        let expected_scale = c.length(
            "expected_scale",
            Some(raw.expected_scale.unwrap_or_default()),
            0,
            EXPECTED_SCALE_MAX,
        );

        let architecture = c.choice(raw.architecture, ArchitectureStyle::Other);
        let scaling_strategy = c.choice(raw.scaling_strategy, ScalingStrategy::None);
        let phase_duration = c.choice(raw.phase_duration, PhaseDuration::HalfDay);
        let starting_point = c.choice(raw.starting_point, StartingPoint::Nothing);

        // A `None` below always has a matching violation recorded above.
        match (
            name,
            description,
            main_user,
            runtime,
            phase_count,
            done,
            architecture_notes,
            expected_scale,
        ) {
            (
                Some(name),
                Some(description),
                Some(main_user),
                Some(runtime),
                Some(phase_count),
                Some(done),
                Some(architecture_notes),
                Some(expected_scale),
            ) if c.violations.is_empty() => Ok(Self {
                name,
                description,
                main_user,
                runtime,
                language: raw.language.unwrap_or_else(|| DEFAULT_LANGUAGE.to_owned()),
                phase_count,
                done,
                constraints: raw.constraints.unwrap_or_default(),
                architecture,
                architecture_notes,
                scaling_strategy,
                expected_scale,
                avoid: raw.avoid.unwrap_or_default(),
                phase_duration,
                starting_point,
            }),
            _ => Err(SpecValidationError {
                violations: c.violations,
            }),
        }
    }

    /// Decode and validate a spec document.
    ///
    /// Values of the wrong JSON type (e.g. `"phase_count": "seven"`) are
    /// reported as a `document` violation, so only text that is not JSON at
    /// all yields [`SpecDocumentError::Syntax`].
    pub fn from_json_str(s: &str) -> Result<Self, SpecDocumentError> {
        let raw: RawProjectSpec = serde_json::from_str(s).map_err(|e| {
            if e.is_data() {
                SpecDocumentError::Invalid(SpecValidationError {
                    violations: vec![Violation {
                        field: "document".to_owned(),
                        reason: e.to_string(),
                    }],
                })
            } else {
                SpecDocumentError::Syntax(e)
            }
        })?;
        Ok(Self::validate(raw)?)
    }
}

/// Errors from decoding a spec document.
#[derive(Debug, Error)]
pub enum SpecDocumentError {
    #[error("not valid JSON: {0}")]
    Syntax(#[source] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] SpecValidationError),
}
