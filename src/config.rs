// Tue Jan 13 2026 - Alex

use crate::criteria::{PathCriterion, ReflectionCriterion};
use crate::discovery::DiscoveryError;
use crate::fault::FaultMode;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_EXTENSIONS: &[&str] = &["dll", "so", "dylib", "exe"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraversalMode {
    TopLevelOnly,
    #[default]
    Recursive,
}

impl TraversalMode {
    /// Recursive wins when the same root is configured twice.
    pub fn merge(self, other: TraversalMode) -> TraversalMode {
        if self == TraversalMode::Recursive || other == TraversalMode::Recursive {
            TraversalMode::Recursive
        } else {
            TraversalMode::TopLevelOnly
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoaderConfig {
    pub roots: IndexMap<PathBuf, TraversalMode>,
    pub path_criteria: Vec<PathCriterion>,
    pub reflection_criteria: Vec<ReflectionCriterion>,
    pub rethrow_on_fault: bool,
    /// Lower-case, without the dot. Empty means every regular file is a candidate.
    pub extensions: Vec<String>,
    pub max_threads: usize,
    pub parallel: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            roots: IndexMap::new(),
            path_criteria: Vec::new(),
            reflection_criteria: Vec::new(),
            rethrow_on_fault: false,
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            max_threads: num_cpus::get(),
            parallel: true,
        }
    }
}

impl LoaderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root<P: AsRef<Path>>(mut self, root: P, mode: TraversalMode) -> Self {
        let root = root.as_ref().to_path_buf();
        let merged = match self.roots.get(&root) {
            Some(existing) => existing.merge(mode),
            None => mode,
        };
        self.roots.insert(root, merged);
        self
    }

    pub fn with_path_criterion(mut self, criterion: PathCriterion) -> Self {
        self.path_criteria.push(criterion);
        self
    }

    pub fn with_reflection_criterion(mut self, criterion: ReflectionCriterion) -> Self {
        self.reflection_criteria.push(criterion);
        self
    }

    pub fn with_rethrow_on_fault(mut self, rethrow: bool) -> Self {
        self.rethrow_on_fault = rethrow;
        self
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_lowercase())
            .collect();
        self
    }

    pub fn with_max_threads(mut self, threads: usize) -> Self {
        self.max_threads = threads;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn fault_mode(&self) -> FaultMode {
        FaultMode::from_rethrow(self.rethrow_on_fault)
    }

    pub fn validate(&self) -> Result<(), DiscoveryError> {
        if self.roots.is_empty() {
            return Err(DiscoveryError::NoRoots);
        }
        if self.max_threads == 0 {
            return Err(DiscoveryError::InvalidThreadCount);
        }
        if self.extensions.iter().any(|e| e.is_empty()) {
            return Err(DiscoveryError::InvalidConfig(
                "file extensions must not be empty strings".to_string(),
            ));
        }
        Ok(())
    }
}
