// Tue Jan 13 2026 - Alex

use crate::config::{LoaderConfig, TraversalMode, DEFAULT_EXTENSIONS};
use crate::criteria::{PathCriterion, ReflectionCriterion};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootEntry {
    pub path: PathBuf,
    #[serde(default)]
    pub mode: TraversalMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CriteriaConfig {
    pub exclude_resource_modules: bool,
    pub exclude_system_binaries: bool,
    pub exclude_file_names: Vec<String>,
    pub require_assignable_to: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub roots: Vec<RootEntry>,
    pub extensions: Vec<String>,
    pub criteria: CriteriaConfig,
    pub rethrow_on_fault: bool,
    pub threads: Option<usize>,
    pub parallel: bool,
}

impl Default for CriteriaConfig {
    fn default() -> Self {
        Self {
            exclude_resource_modules: true,
            exclude_system_binaries: false,
            exclude_file_names: Vec::new(),
            require_assignable_to: Vec::new(),
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            criteria: CriteriaConfig::default(),
            rethrow_on_fault: false,
            threads: None,
            parallel: true,
        }
    }
}

impl ConfigFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let ext = path.extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");

        match ext.to_lowercase().as_str() {
            "json" => {
                let contents = fs::read_to_string(path)?;
                let config: ConfigFile = serde_json::from_str(&contents)
                    .map_err(|e| ConfigError::ParseError(e.to_string()))?;
                config.validate()?;
                Ok(config)
            }
            _ => Err(ConfigError::UnsupportedFormat(ext.to_string())),
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, contents)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.threads == Some(0) {
            return Err(ConfigError::ValidationError("threads must be > 0".to_string()));
        }
        if self.criteria.require_assignable_to.iter().any(|t| t.trim().is_empty()) {
            return Err(ConfigError::ValidationError(
                "require_assignable_to entries must not be blank".to_string(),
            ));
        }
        Ok(())
    }

    /// Relative roots are resolved against `base`, normally the config file's directory.
    pub fn to_loader_config(&self, base: &Path) -> LoaderConfig {
        let mut config = LoaderConfig::new()
            .with_extensions(&self.extensions)
            .with_rethrow_on_fault(self.rethrow_on_fault)
            .with_parallel(self.parallel);

        if let Some(threads) = self.threads {
            config = config.with_max_threads(threads);
        }

        for root in &self.roots {
            let path = if root.path.is_absolute() {
                root.path.clone()
            } else {
                base.join(&root.path)
            };
            config = config.with_root(path, root.mode);
        }

        if self.criteria.exclude_resource_modules {
            config = config.with_path_criterion(PathCriterion::exclude_resource_modules());
        }
        if self.criteria.exclude_system_binaries {
            config = config.with_path_criterion(PathCriterion::exclude_system_binaries());
        }
        if !self.criteria.exclude_file_names.is_empty() {
            config = config.with_path_criterion(PathCriterion::exclude_file_names(
                &self.criteria.exclude_file_names,
            ));
        }
        if !self.criteria.require_assignable_to.is_empty() {
            config = config.with_reflection_criterion(ReflectionCriterion::load_types_assignable_from_any(
                self.criteria.require_assignable_to.iter().cloned(),
            ));
        }

        config
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0:?}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Serialize error: {0}")]
    SerializeError(String),
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
}
