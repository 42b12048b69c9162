// Tue Jan 13 2026 - Alex

use crate::criteria::CriterionError;
use crate::inspect::LoadFault;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaultStage {
    PathCriterion,
    Load,
    ReflectionCriterion,
}

impl fmt::Display for FaultStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaultStage::PathCriterion => write!(f, "path-criterion"),
            FaultStage::Load => write!(f, "load"),
            FaultStage::ReflectionCriterion => write!(f, "reflection-criterion"),
        }
    }
}

#[derive(Error, Debug)]
pub enum FaultError {
    #[error(transparent)]
    Criterion(#[from] CriterionError),
    #[error(transparent)]
    Load(#[from] LoadFault),
}

/// One unexpected error hit while resolving a candidate. Immutable once built.
#[derive(Debug)]
pub struct FaultRecord {
    ordinal: usize,
    path: PathBuf,
    stage: FaultStage,
    criterion: Option<String>,
    error: FaultError,
}

impl FaultRecord {
    pub fn new(
        ordinal: usize,
        path: &Path,
        stage: FaultStage,
        criterion: Option<&str>,
        error: FaultError,
    ) -> Self {
        Self {
            ordinal,
            path: path.to_path_buf(),
            stage,
            criterion: criterion.map(str::to_string),
            error,
        }
    }

    /// Position of the candidate in enumeration order
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn stage(&self) -> FaultStage {
        self.stage
    }

    pub fn criterion(&self) -> Option<&str> {
        self.criterion.as_deref()
    }

    pub fn error(&self) -> &FaultError {
        &self.error
    }

    pub fn into_error(self) -> FaultError {
        self.error
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "path": self.path.display().to_string(),
            "stage": self.stage.to_string(),
            "criterion": self.criterion,
            "error": self.error.to_string(),
        })
    }
}

impl fmt::Display for FaultRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} fault on {}", self.stage, self.path.display())?;
        if let Some(criterion) = &self.criterion {
            write!(f, " [{}]", criterion)?;
        }
        write!(f, ": {}", self.error)
    }
}
