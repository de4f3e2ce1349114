//! CLI argument parsing for rjmx-confgen
//!
//! This module provides the command-line interface using clap derive macros.
//!
//! # Options
//!
//! - `TARGET`: JMX target handed to the enumerator, e.g. `localhost:9999`
//! - `--config` / `-c`: Configuration file path (default: rjmx-confgen.yaml, env: RJMX_CONFGEN_CONFIG)
//! - `--java`: Program used to run the enumerator (env: RJMX_CONFGEN_JAVA)
//! - `--dump-jar`: Enumerator jar, run as `<java> -jar <jar> <target>` (env: RJMX_CONFGEN_DUMP_JAR)
//! - `--mode`: Rule granularity (label/bean)
//! - `--parse-policy`: Malformed enumerator lines (skip/abort)
//! - `--output` / `-o`: File written when the clipboard is unavailable
//! - `--start-delay-seconds`, `--ssl`, `--lowercase-output-name`,
//!   `--lowercase-output-label-names`: Exporter settings written to the document
//! - `--refresh-delay`, `--refresh-interval`: Background refresh timing in milliseconds
//! - `--list`: Print the catalog and exit without starting the UI
//! - `--output-format`: Output format for --list (text/json/yaml)
//! - `--log-level` / `-l`: Log level (trace/debug/info/warn/error, env: RJMX_CONFGEN_LOG_LEVEL)
//! - `--log-file`: Also append log output to a file
//!
//! # Precedence
//!
//! Configuration values are resolved in the following order (highest to lowest priority):
//! 1. CLI arguments
//! 2. Environment variables
//! 3. Configuration file
//! 4. Default values

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::{Config, ConfigError};
use crate::enumerator::{ParsePolicy, TARGET_PLACEHOLDER};
use crate::transformer::RuleMode;

/// rjmx-confgen - Interactive JMX exporter config builder
///
/// Lists the MBeans of a running JVM through an external enumerator and
/// builds Prometheus JMX exporter rules from the beans and labels you pick.
#[derive(Parser, Debug)]
#[command(name = "rjmx-confgen")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// JMX target, e.g. localhost:9999
    #[arg(value_name = "TARGET")]
    pub target: String,

    /// Path to configuration file
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "rjmx-confgen.yaml",
        env = "RJMX_CONFGEN_CONFIG"
    )]
    pub config: PathBuf,

    /// Program used to run the enumerator (overrides config file)
    #[arg(long, value_name = "PROGRAM", env = "RJMX_CONFGEN_JAVA")]
    pub java: Option<String>,

    /// Enumerator jar (overrides config file arguments)
    #[arg(long, value_name = "JAR", env = "RJMX_CONFGEN_DUMP_JAR")]
    pub dump_jar: Option<PathBuf>,

    /// Rule granularity (overrides config file)
    #[arg(long, value_enum)]
    pub mode: Option<RuleMode>,

    /// Handling of malformed enumerator lines (overrides config file)
    #[arg(long, value_enum)]
    pub parse_policy: Option<ParsePolicy>,

    /// File written when the clipboard is unavailable (overrides config file)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Exporter startDelaySeconds (overrides config file)
    #[arg(long, value_name = "SECONDS")]
    pub start_delay_seconds: Option<u32>,

    /// Exporter ssl (overrides config file)
    #[arg(long)]
    pub ssl: bool,

    /// Exporter lowercaseOutputName (overrides config file)
    #[arg(long)]
    pub lowercase_output_name: bool,

    /// Exporter lowercaseOutputLabelNames (overrides config file)
    #[arg(long)]
    pub lowercase_output_label_names: bool,

    /// Delay before the first background refresh in milliseconds
    #[arg(long, value_name = "MS")]
    pub refresh_delay: Option<u64>,

    /// Interval between background refreshes in milliseconds
    #[arg(long, value_name = "MS")]
    pub refresh_interval: Option<u64>,

    /// Print the catalog and exit
    #[arg(long)]
    pub list: bool,

    /// Output format for --list
    #[arg(long, value_enum, default_value = "text")]
    pub output_format: OutputFormat,

    /// Log level
    #[arg(
        short,
        long,
        value_enum,
        default_value = "info",
        env = "RJMX_CONFGEN_LOG_LEVEL"
    )]
    pub log_level: LogLevel,

    /// Append log output to this file as well
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Apply CLI overrides on top of a loaded configuration and validate it
    ///
    /// # Errors
    /// Returns `ConfigError::ValidationError` if the merged configuration is invalid
    pub fn apply(&self, config: &mut Config) -> Result<(), ConfigError> {
        if self.target.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "Target must not be empty".to_string(),
            ));
        }

        if let Some(java) = &self.java {
            config.enumerator.program = java.clone();
        }
        if let Some(jar) = &self.dump_jar {
            config.enumerator.args = vec![
                "-jar".to_string(),
                jar.display().to_string(),
                TARGET_PLACEHOLDER.to_string(),
            ];
        }
        if let Some(mode) = self.mode {
            config.selection.mode = mode;
        }
        if let Some(policy) = self.parse_policy {
            config.parse.policy = policy;
        }
        if let Some(output) = &self.output {
            config.output.fallback_path = output.clone();
        }
        if let Some(delay) = self.start_delay_seconds {
            config.exporter.start_delay_seconds = delay;
        }
        if self.ssl {
            config.exporter.ssl = true;
        }
        if self.lowercase_output_name {
            config.exporter.lowercase_output_name = true;
        }
        if self.lowercase_output_label_names {
            config.exporter.lowercase_output_label_names = true;
        }
        if let Some(delay) = self.refresh_delay {
            config.refresh.initial_delay_ms = delay;
        }
        if let Some(interval) = self.refresh_interval {
            config.refresh.interval_ms = interval;
        }

        config.validate()
    }
}

/// Log level options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Trace level - most verbose
    Trace,
    /// Debug level
    Debug,
    /// Info level - default
    Info,
    /// Warn level
    Warn,
    /// Error level - least verbose
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Output format options for --list
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Yaml => write!(f, "yaml"),
        }
    }
}
