//! TOML-based configuration.
//!
//! Example:
//!
//! ```toml
//! [scan]
//! sample_size = 1000
//! max_concurrent_samples = 4
//! fixture = "${HOME}/fixtures/erp.json"
//!
//! [inference]
//! min_confidence = 0.3
//!
//! [semantic]
//! rule_based = true
//! ```
//!
//! Every section and field is optional; omitted fields take the built-in
//! defaults, which match the pipeline's constants.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::inference::thresholds::{cutoff, sampling};
use crate::inference::InferenceConfig;
use crate::scan::ScanOptions;

/// Errors from loading configuration.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("environment variable not set: {0}")]
    MissingEnvVar(String),
}

/// Root settings record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub scan: ScanSettings,
    pub inference: InferenceSettings,
    pub semantic: SemanticSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    /// Rows sampled per column while building nodes.
    pub sample_size: usize,
    /// Concurrent containment-sampling calls during inference.
    pub max_concurrent_samples: usize,
    /// Default fixture path; supports `${VAR}` expansion.
    pub fixture: Option<String>,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            sample_size: sampling::SOURCE_ROWS,
            max_concurrent_samples: 1,
            fixture: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceSettings {
    /// Edge acceptance threshold.
    pub min_confidence: f64,
}

impl Default for InferenceSettings {
    fn default() -> Self {
        Self {
            min_confidence: cutoff::EDGE_MIN,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SemanticSettings {
    /// Run the built-in rule-based explainer during merge.
    pub rule_based: bool,
}

impl Default for SemanticSettings {
    fn default() -> Self {
        Self { rule_based: true }
    }
}

impl Settings {
    /// Load settings from a specific TOML file.
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Resolution order: `CARTOGRAPH_CONFIG`, then `./cartograph.toml`,
    /// then built-in defaults.
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = std::env::var("CARTOGRAPH_CONFIG") {
            return Self::from_file(Path::new(&path));
        }
        let local = Path::new("cartograph.toml");
        if local.exists() {
            return Self::from_file(local);
        }
        Ok(Self::default())
    }

    /// Fixture path with `${VAR}` references expanded.
    pub fn resolved_fixture(&self) -> Result<Option<PathBuf>, SettingsError> {
        match &self.scan.fixture {
            Some(raw) => Ok(Some(PathBuf::from(expand_env_vars(raw)?))),
            None => Ok(None),
        }
    }

    /// Bridge into pipeline options.
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            inference: InferenceConfig::default()
                .with_min_confidence(self.inference.min_confidence)
                .with_max_concurrent_samples(self.scan.max_concurrent_samples),
            stats_sample_size: self.scan.sample_size,
        }
    }
}

/// Expand `${VAR}` references against the process environment.
///
/// A `${` without a closing `}` is kept as written. A reference to an
/// unset variable is an error, not an empty substitution.
pub fn expand_env_vars(input: &str) -> Result<String, SettingsError> {
    let mut result = String::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '$' && chars.peek() == Some(&'{') {
            chars.next();
            let mut name = String::new();
            let mut closed = false;
            for c in chars.by_ref() {
                if c == '}' {
                    closed = true;
                    break;
                }
                name.push(c);
            }
            if !closed {
                result.push_str("${");
                result.push_str(&name);
                continue;
            }
            match std::env::var(&name) {
                Ok(value) => result.push_str(&value),
                Err(_) => return Err(SettingsError::MissingEnvVar(name)),
            }
        } else {
            result.push(c);
        }
    }

    Ok(result)
}
