use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::validate::{RawProjectSpec, SpecValidationError};

// ---------------------------------------------------------------------------
// Closed-set enumerations
// ---------------------------------------------------------------------------

/// A spec field whose value must come from a fixed set of strings.
///
/// Implemented by every enumeration in [`ProjectSpec`] so that validation,
/// the interactive chooser and error messages can list the allowed values.
pub trait ClosedSet: Copy + Eq + fmt::Display + FromStr<Err = UnknownVariant> + 'static {
    /// Name of the spec field this set belongs to (e.g. `architecture`).
    const FIELD: &'static str;
    /// Every member of the set, in display order.
    const ALL: &'static [Self];

    /// The serialized string value.
    fn as_str(self) -> &'static str;

    /// Comma-separated list of allowed values.
    fn choices() -> String {
        Self::ALL
            .iter()
            .map(|v| v.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Error returned when parsing a string that is not a member of a [`ClosedSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub field: &'static str,
    pub value: String,
    pub expected: String,
}

impl UnknownVariant {
    fn new<T: ClosedSet>(value: &str) -> Self {
        Self {
            field: T::FIELD,
            value: value.to_owned(),
            expected: T::choices(),
        }
    }
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid {}: {:?} (expected one of: {})",
            self.field, self.value, self.expected
        )
    }
}

impl std::error::Error for UnknownVariant {}

// ---------------------------------------------------------------------------

/// High-level architecture pattern for the project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchitectureStyle {
    Microservices,
    EventDriven,
    Serverless,
    Other,
}

impl ClosedSet for ArchitectureStyle {
    const FIELD: &'static str = "architecture";
    const ALL: &'static [Self] = &[
        Self::Microservices,
        Self::EventDriven,
        Self::Serverless,
        Self::Other,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::Microservices => "microservices",
            Self::EventDriven => "event_driven",
            Self::Serverless => "serverless",
            Self::Other => "other",
        }
    }
}

impl FromStr for ArchitectureStyle {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "microservices" => Ok(Self::Microservices),
            "event_driven" => Ok(Self::EventDriven),
            "serverless" => Ok(Self::Serverless),
            "other" => Ok(Self::Other),
            other => Err(UnknownVariant::new::<Self>(other)),
        }
    }
}

// ---------------------------------------------------------------------------

/// How the project is expected to scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalingStrategy {
    None,
    Vertical,
    Horizontal,
    Serverless,
    Auto,
}

impl ClosedSet for ScalingStrategy {
    const FIELD: &'static str = "scaling_strategy";
    const ALL: &'static [Self] = &[
        Self::None,
        Self::Vertical,
        Self::Horizontal,
        Self::Serverless,
        Self::Auto,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Vertical => "vertical",
            Self::Horizontal => "horizontal",
            Self::Serverless => "serverless",
            Self::Auto => "auto",
        }
    }
}

impl FromStr for ScalingStrategy {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "vertical" => Ok(Self::Vertical),
            "horizontal" => Ok(Self::Horizontal),
            "serverless" => Ok(Self::Serverless),
            "auto" => Ok(Self::Auto),
            other => Err(UnknownVariant::new::<Self>(other)),
        }
    }
}

// ---------------------------------------------------------------------------

/// Rough time budget for each phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseDuration {
    #[serde(rename = "1-2h")]
    OneToTwoHours,
    #[serde(rename = "half-day")]
    HalfDay,
    #[serde(rename = "full-day")]
    FullDay,
    #[serde(rename = "multi-day")]
    MultiDay,
}

impl ClosedSet for PhaseDuration {
    const FIELD: &'static str = "phase_duration";
    const ALL: &'static [Self] = &[
        Self::OneToTwoHours,
        Self::HalfDay,
        Self::FullDay,
        Self::MultiDay,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::OneToTwoHours => "1-2h",
            Self::HalfDay => "half-day",
            Self::FullDay => "full-day",
            Self::MultiDay => "multi-day",
        }
    }
}

impl FromStr for PhaseDuration {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1-2h" => Ok(Self::OneToTwoHours),
            "half-day" => Ok(Self::HalfDay),
            "full-day" => Ok(Self::FullDay),
            "multi-day" => Ok(Self::MultiDay),
            other => Err(UnknownVariant::new::<Self>(other)),
        }
    }
}

// ---------------------------------------------------------------------------

/// Where the project is right now. Shapes what the earliest phases look like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartingPoint {
    Nothing,
    Existing,
    Prototype,
    Mvp,
}

impl ClosedSet for StartingPoint {
    const FIELD: &'static str = "starting_point";
    const ALL: &'static [Self] = &[Self::Nothing, Self::Existing, Self::Prototype, Self::Mvp];

    fn as_str(self) -> &'static str {
        match self {
            Self::Nothing => "nothing",
            Self::Existing => "existing",
            Self::Prototype => "prototype",
            Self::Mvp => "mvp",
        }
    }
}

impl FromStr for StartingPoint {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nothing" => Ok(Self::Nothing),
            "existing" => Ok(Self::Existing),
            "prototype" => Ok(Self::Prototype),
            "mvp" => Ok(Self::Mvp),
            other => Err(UnknownVariant::new::<Self>(other)),
        }
    }
}

macro_rules! display_via_as_str {
    ($($ty:ty),+) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )+
    };
}

display_via_as_str!(ArchitectureStyle, ScalingStrategy, PhaseDuration, StartingPoint);

// ---------------------------------------------------------------------------
// ProjectSpec
// ---------------------------------------------------------------------------

/// A validated project description.
///
/// Only constructible through [`ProjectSpec::validate`] (or deserialization,
/// which runs the same validation), so every instance satisfies the field
/// constraints. Fields are read through accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawProjectSpec")]
pub struct ProjectSpec {
    pub(super) name: String,
    pub(super) description: String,
    pub(super) main_user: String,
    pub(super) runtime: String,
    pub(super) language: String,
    pub(super) phase_count: u32,
    pub(super) done: Vec<String>,
    pub(super) constraints: Vec<String>,
    pub(super) architecture: ArchitectureStyle,
    pub(super) architecture_notes: String,
    pub(super) scaling_strategy: ScalingStrategy,
    pub(super) expected_scale: String,
    pub(super) avoid: Vec<String>,
    pub(super) phase_duration: PhaseDuration,
    pub(super) starting_point: StartingPoint,
}

impl TryFrom<RawProjectSpec> for ProjectSpec {
    type Error = SpecValidationError;

    fn try_from(raw: RawProjectSpec) -> Result<Self, Self::Error> {
        Self::validate(raw)
    }
}

impl ProjectSpec {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn main_user(&self) -> &str {
        &self.main_user
    }

    pub fn runtime(&self) -> &str {
        &self.runtime
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Number of phases, always within [`Self::MIN_PHASES`]..=[`Self::MAX_PHASES`].
    pub fn phase_count(&self) -> u32 {
        self.phase_count
    }

    /// Completion criteria. May be empty.
    pub fn done(&self) -> &[String] {
        &self.done
    }

    pub fn constraints(&self) -> &[String] {
        &self.constraints
    }

    pub fn architecture(&self) -> ArchitectureStyle {
        self.architecture
    }

    pub fn architecture_notes(&self) -> &str {
        &self.architecture_notes
    }

    pub fn scaling_strategy(&self) -> ScalingStrategy {
        self.scaling_strategy
    }

    pub fn expected_scale(&self) -> &str {
        &self.expected_scale
    }

    pub fn avoid(&self) -> &[String] {
        &self.avoid
    }

    pub fn phase_duration(&self) -> PhaseDuration {
        self.phase_duration
    }

    pub fn starting_point(&self) -> StartingPoint {
        self.starting_point
    }
}
