//! rjmx-confgen library
//!
//! This crate provides the core functionality for browsing the MBeans of a
//! running JVM and building Prometheus JMX exporter rules from the beans and
//! labels the operator selects.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod enumerator;
pub mod error;
pub mod listing;
pub mod logging;
pub mod persist;
pub mod refresh;
pub mod selection;
pub mod transformer;
pub mod ui;

use std::fs::OpenOptions;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::Level;
use tracing_subscriber::{
    filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use logging::{LogBuffer, SharedFileWriter};

/// Primary log destination
#[derive(Debug, Clone)]
pub enum LogSink {
    /// In-memory buffer rendered by the log pane
    Pane(LogBuffer),
    /// Standard error, for non-interactive runs
    Stderr,
}

/// Initialize the logging subsystem
///
/// # Arguments
/// * `level` - Default level when `RUST_LOG` is not set
/// * `sink` - Where log lines go
/// * `log_file` - Optional file that receives every event as a JSON line
///
/// # Errors
/// Returns an error if the log file cannot be opened or the logging system
/// fails to initialize
pub fn init_logging(level: Level, sink: LogSink, log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::default().add_directive(LevelFilter::from_level(level).into())
    });

    let (pane, stderr) = match sink {
        LogSink::Pane(buffer) => (
            Some(fmt::layer().with_ansi(false).with_writer(buffer)),
            None,
        ),
        LogSink::Stderr => (None, Some(fmt::layer().with_writer(std::io::stderr))),
    };

    let file = log_file
        .map(|path| {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))
        })
        .transpose()?
        .map(|f| fmt::layer().json().with_writer(SharedFileWriter::new(f)));

    tracing_subscriber::registry()
        .with(filter)
        .with(pane)
        .with(stderr)
        .with(file)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
