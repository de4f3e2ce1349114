//! Configuration management for rjmx-confgen
//!
//! Handles loading and validating tool settings from an optional YAML file.
//! CLI arguments are applied on top by [`crate::cli::Cli::apply`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::enumerator::ParsePolicy;
use crate::transformer::RuleMode;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error reading the configuration file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Error parsing the configuration file
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// External enumerator invocation
    #[serde(default)]
    pub enumerator: EnumeratorConfig,

    /// Static settings copied into the generated document
    #[serde(default)]
    pub exporter: ExporterConfig,

    /// Background refresh cadence
    #[serde(default)]
    pub refresh: RefreshConfig,

    /// Save destination
    #[serde(default)]
    pub output: OutputConfig,

    /// Selection behavior
    #[serde(default)]
    pub selection: SelectionConfig,

    /// Enumerator output parsing
    #[serde(default)]
    pub parse: ParseConfig,
}

/// External enumerator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumeratorConfig {
    /// Program to execute
    #[serde(default = "default_program")]
    pub program: String,

    /// Arguments; `{target}` is replaced by the target address
    #[serde(default = "default_args")]
    pub args: Vec<String>,

    /// Execution timeout in milliseconds
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
}

/// Exporter settings written at the top of the generated document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExporterConfig {
    /// Seconds the exporter waits before the first scrape
    #[serde(default = "default_start_delay")]
    pub start_delay_seconds: u32,

    /// Use SSL for the JMX connection
    #[serde(default)]
    pub ssl: bool,

    /// Lowercase generated metric names
    #[serde(default)]
    pub lowercase_output_name: bool,

    /// Lowercase generated label names
    #[serde(default)]
    pub lowercase_output_label_names: bool,
}

/// Refresh timer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Delay before the first background refresh
    #[serde(default = "default_initial_delay")]
    pub initial_delay_ms: u64,

    /// Interval between refreshes
    #[serde(default = "default_interval")]
    pub interval_ms: u64,
}

/// Save destination configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// File written when the clipboard is unavailable
    #[serde(default = "default_fallback_path")]
    pub fallback_path: PathBuf,
}

/// Selection configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Label-level or bean-level rules
    #[serde(default)]
    pub mode: RuleMode,
}

/// Parse configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseConfig {
    /// What to do with malformed enumerator lines
    #[serde(default)]
    pub policy: ParsePolicy,
}

// Default value functions
fn default_program() -> String {
    "java".to_string()
}

fn default_args() -> Vec<String> {
    vec![
        "-jar".to_string(),
        "./jmx_dump.jar".to_string(),
        "{target}".to_string(),
    ]
}

fn default_timeout() -> u64 {
    30_000
}

fn default_start_delay() -> u32 {
    30
}

fn default_initial_delay() -> u64 {
    2_000
}

fn default_interval() -> u64 {
    5_000
}

fn default_fallback_path() -> PathBuf {
    PathBuf::from("conf.yaml")
}

impl Default for EnumeratorConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: default_args(),
            timeout_ms: default_timeout(),
        }
    }
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            start_delay_seconds: default_start_delay(),
            ssl: false,
            lowercase_output_name: false,
            lowercase_output_label_names: false,
        }
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: default_initial_delay(),
            interval_ms: default_interval(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            fallback_path: default_fallback_path(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed or validated
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file, falling back to defaults if not found
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "Config file not found, using defaults"
            );
            return Ok(Self::default());
        }

        Self::load(path)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.enumerator.program.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "Enumerator program must not be empty".to_string(),
            ));
        }

        if self.enumerator.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "Enumerator timeout must be greater than 0".to_string(),
            ));
        }

        if self.refresh.interval_ms == 0 {
            return Err(ConfigError::ValidationError(
                "Refresh interval must be greater than 0".to_string(),
            ));
        }

        if self.output.fallback_path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "Fallback output path must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.enumerator.program, "java");
        assert_eq!(config.enumerator.args, vec!["-jar", "./jmx_dump.jar", "{target}"]);
        assert_eq!(config.exporter.start_delay_seconds, 30);
        assert!(!config.exporter.ssl);
        assert_eq!(config.refresh.initial_delay_ms, 2000);
        assert_eq!(config.refresh.interval_ms, 5000);
        assert_eq!(config.output.fallback_path, PathBuf::from("conf.yaml"));
        assert_eq!(config.selection.mode, RuleMode::Label);
        assert_eq!(config.parse.policy, ParsePolicy::Skip);
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        config.refresh.interval_ms = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.enumerator.program = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = r#"
enumerator:
  program: cat
exporter:
  lowercaseOutputName: true
selection:
  mode: bean
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.enumerator.program, "cat");
        assert_eq!(config.enumerator.timeout_ms, 30_000);
        assert!(config.exporter.lowercase_output_name);
        assert_eq!(config.exporter.start_delay_seconds, 30);
        assert_eq!(config.selection.mode, RuleMode::Bean);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = Config::load_or_default("/nonexistent/rjmx-confgen.yaml").unwrap();
        assert_eq!(config, Config::default());
    }
}
