//! Reading and writing spec and plan documents.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::plan::{PhasePlan, PlanShapeError};
use crate::spec::{ProjectSpec, SpecDocumentError, SpecValidationError};

/// Errors from the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to access {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid spec in {}", path.display())]
    InvalidSpec {
        path: PathBuf,
        #[source]
        source: SpecValidationError,
    },

    #[error("invalid plan in {}", path.display())]
    InvalidPlan {
        path: PathBuf,
        #[source]
        source: PlanShapeError,
    },
}

/// A directory holding `spec.json` and `plan.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    dir: PathBuf,
}

impl Workspace {
    pub const SPEC_FILE: &'static str = "spec.json";
    pub const PLAN_FILE: &'static str = "plan.json";

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn spec_path(&self) -> PathBuf {
        self.dir.join(Self::SPEC_FILE)
    }

    pub fn plan_path(&self) -> PathBuf {
        self.dir.join(Self::PLAN_FILE)
    }

    /// Load and validate the spec at `path`.
    pub fn load_spec(&self, path: &Path) -> Result<ProjectSpec, StoreError> {
        let text = read(path)?;
        ProjectSpec::from_json_str(&text).map_err(|e| match e {
            SpecDocumentError::Syntax(source) => StoreError::Json {
                path: path.to_owned(),
                source,
            },
            SpecDocumentError::Invalid(source) => StoreError::InvalidSpec {
                path: path.to_owned(),
                source,
            },
        })
    }

    pub fn save_spec(&self, spec: &ProjectSpec) -> Result<PathBuf, StoreError> {
        let path = self.spec_path();
        write_json(&path, spec)?;
        Ok(path)
    }

    /// Load the workspace plan and check its shape.
    pub fn load_plan(&self) -> Result<PhasePlan, StoreError> {
        let path = self.plan_path();
        let text = read(&path)?;
        let plan: PhasePlan = serde_json::from_str(&text).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;
        plan.validate()
            .map_err(|source| StoreError::InvalidPlan { path, source })?;
        Ok(plan)
    }

    pub fn save_plan(&self, plan: &PhasePlan) -> Result<PathBuf, StoreError> {
        let path = self.plan_path();
        write_json(&path, plan)?;
        Ok(path)
    }
}

fn read(path: &Path) -> Result<String, StoreError> {
    debug!(path = %path.display(), "reading document");
    fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            StoreError::NotFound {
                path: path.to_owned(),
            }
        } else {
            StoreError::Io {
                path: path.to_owned(),
                source,
            }
        }
    })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io {
        path: path.to_owned(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let mut text = serde_json::to_string_pretty(value).map_err(|source| StoreError::Json {
        path: path.to_owned(),
        source,
    })?;
    text.push('\n');
    fs::write(path, text).map_err(io_err)?;
    debug!(path = %path.display(), "wrote document");
    Ok(())
}
