//! Plugin options.
//!
//! Options are passed by the host when the plugin is registered, either as a
//! JSON object or read from an optional `cascade-copy.toml` in the project
//! directory.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! extensions = [".html"]   # Output suffixes the transform acts on
//! dot = false              # Let globs match hidden files and directories
//! debug = false            # Log per-page resolution decisions
//! key = "eleventyCopy"     # Data key holding the copy directive
//! ```
//!
//! `extensions` may also be a comma-separated string:
//!
//! ```toml
//! extensions = ".html, .htm"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the optional options file.
pub const OPTIONS_FILENAME: &str = "cascade-copy.toml";

/// Default data key holding a copy directive.
pub const DEFAULT_KEY: &str = "eleventyCopy";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Options parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Options controlling the copy transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CopyOptions {
    /// Output path suffixes the transform acts on.
    pub extensions: Extensions,
    /// Whether globs may match hidden files.
    pub dot: bool,
    /// Log per-page resolution decisions.
    pub debug: bool,
    /// Data key holding the copy directive, in page data and sidecars.
    pub key: String,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            extensions: Extensions::default(),
            dot: false,
            debug: false,
            key: DEFAULT_KEY.to_string(),
        }
    }
}

impl CopyOptions {
    /// Parse options from a host-supplied JSON object.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, ConfigError> {
        let options: Self = serde_json::from_value(value.clone())?;
        options.validate()?;
        Ok(options)
    }

    /// Validate option values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.extensions.to_list().is_empty() {
            return Err(ConfigError::Validation(
                "extensions must name at least one suffix".into(),
            ));
        }
        if self.key.trim().is_empty() {
            return Err(ConfigError::Validation("key must not be empty".into()));
        }
        Ok(())
    }

    /// Whether the transform should act on `output_path`.
    pub fn watches(&self, output_path: &str) -> bool {
        self.extensions
            .to_list()
            .iter()
            .any(|ext| output_path.ends_with(ext.as_str()))
    }
}

/// Watched output suffixes: a list, or one comma-separated string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Extensions {
    List(Vec<String>),
    Csv(String),
}

impl Default for Extensions {
    fn default() -> Self {
        Extensions::List(vec![".html".to_string()])
    }
}

impl Extensions {
    /// Canonical list form: entries trimmed, empty entries dropped.
    pub fn to_list(&self) -> Vec<String> {
        let raw: Vec<&str> = match self {
            Extensions::List(items) => items.iter().map(String::as_str).collect(),
            Extensions::Csv(s) => s.split(',').collect(),
        };
        raw.into_iter()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }
}

/// Load `cascade-copy.toml` from a directory as options.
///
/// Returns `Ok(None)` if no options file exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML or values.
pub fn load_raw_options(dir: &Path) -> Result<Option<CopyOptions>, ConfigError> {
    let path = dir.join(OPTIONS_FILENAME);
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&path)?;
    let options: CopyOptions = toml::from_str(&content)?;
    Ok(Some(options))
}

/// Load options from a directory, falling back to defaults.
pub fn load_options(dir: &Path) -> Result<CopyOptions, ConfigError> {
    let options = load_raw_options(dir)?.unwrap_or_default();
    options.validate()?;
    Ok(options)
}
