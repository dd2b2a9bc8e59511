//! TOML-based configuration for refmerge.
//!
//! Every section and field has a default, so an empty file (or no file at
//! all, via [`MergeConfig::default`]) is a valid configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::ConfigError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level configuration loaded from a TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MergeConfig {
    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,

    /// Fixed source layout assumed by method reordering.
    #[serde(default)]
    pub layout: MethodLayout,

    /// Oracle settings.
    #[serde(default)]
    pub oracle: OracleConfig,
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogConfig {
    /// Minimum tracing level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".into()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Line counts of the fixed two-method source shape.
///
/// The source is read as: `header_lines`, a method of `method_lines`,
/// `separator_lines`, a second method of `method_lines`, then `trailer_lines`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MethodLayout {
    #[serde(default = "default_header_lines")]
    pub header_lines: usize,

    #[serde(default = "default_method_lines")]
    pub method_lines: usize,

    #[serde(default = "default_separator_lines")]
    pub separator_lines: usize,

    #[serde(default = "default_trailer_lines")]
    pub trailer_lines: usize,
}

fn default_header_lines() -> usize {
    4
}
fn default_method_lines() -> usize {
    5
}
fn default_separator_lines() -> usize {
    1
}
fn default_trailer_lines() -> usize {
    1
}

impl Default for MethodLayout {
    fn default() -> Self {
        Self {
            header_lines: default_header_lines(),
            method_lines: default_method_lines(),
            separator_lines: default_separator_lines(),
            trailer_lines: default_trailer_lines(),
        }
    }
}

impl MethodLayout {
    /// Total line count of a conforming source.
    pub fn total_lines(&self) -> usize {
        self.header_lines + 2 * self.method_lines + self.separator_lines + self.trailer_lines
    }

    /// Line index at which the first method starts.
    pub fn first_method_start(&self) -> usize {
        self.header_lines
    }

    /// Line index at which the second method starts.
    pub fn second_method_start(&self) -> usize {
        self.header_lines + self.method_lines + self.separator_lines
    }
}

// ---------------------------------------------------------------------------
// Oracle
// ---------------------------------------------------------------------------

/// Oracle configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OracleConfig {
    /// Default answers file; when set, merges replay it instead of prompting.
    #[serde(default)]
    pub answers_file: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Loading & validation
// ---------------------------------------------------------------------------

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

impl MergeConfig {
    /// Load a [`MergeConfig`] from a TOML file at the given path.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading configuration");

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(path)?;
        let mut config: MergeConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        // Relative paths are relative to the config file, not the working directory.
        if let (Some(answers), Some(dir)) = (config.oracle.answers_file.as_mut(), path.parent()) {
            if answers.is_relative() {
                *answers = dir.join(&*answers);
            }
        }

        debug!("configuration parsed successfully");
        Ok(config)
    }

    /// Validate that all values are sane.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !LOG_LEVELS.contains(&self.log.level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "log.level".into(),
                detail: format!("must be one of {}", LOG_LEVELS.join(", ")),
            });
        }
        if self.layout.method_lines == 0 {
            return Err(ConfigError::InvalidValue {
                field: "layout.method_lines".into(),
                detail: "a method must span at least one line".into(),
            });
        }

        Ok(())
    }

    /// Convenience: load and validate in one call.
    pub fn load_and_validate<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::load_from_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Render the configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}
