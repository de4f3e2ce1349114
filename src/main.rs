//! rjmx-confgen - Interactive JMX exporter config builder
//!
//! Enumerates the MBeans of a JVM with an external tool and lets the
//! operator pick the beans and labels to export.

use std::sync::{mpsc, Arc};

use anyhow::Result;
use clap::Parser;
use tracing::{debug, error, info};

use rjmx_confgen::{
    catalog::Catalog,
    cli::Cli,
    config::Config,
    enumerator::{fetch_catalog, CommandEnumerator, ParsePolicy},
    error::{AppResult, EnumerationError},
    listing,
    logging::LogBuffer,
    persist::SystemClipboard,
    refresh::{self, RefreshSettings, RefreshTrigger},
    ui::{self, App},
    LogSink,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let logs = LogBuffer::default();
    let sink = if cli.list {
        LogSink::Stderr
    } else {
        LogSink::Pane(logs.clone())
    };
    rjmx_confgen::init_logging(cli.log_level.into(), sink, cli.log_file.as_deref())?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        target_addr = %cli.target,
        "Starting rjmx-confgen"
    );

    run(cli, logs).await?;
    Ok(())
}

async fn run(cli: Cli, logs: LogBuffer) -> AppResult<()> {
    // Load configuration
    let mut config = Config::load_or_default(&cli.config)?;
    cli.apply(&mut config)?;

    let enumerator = CommandEnumerator::from_config(&config.enumerator);
    let policy = config.parse.policy;
    debug!(
        program = enumerator.program(),
        args = ?enumerator.resolve_args(&cli.target),
        timeout_ms = config.enumerator.timeout_ms,
        "Enumerator configured"
    );

    if cli.list {
        let build = fetch_catalog(&enumerator, &cli.target, policy).await?;
        print!("{}", listing::render(&build.catalog, cli.output_format)?);
        return Ok(());
    }

    let catalog = initial_catalog(&enumerator, &cli.target, policy).await?;

    let (tx, rx) = mpsc::channel();
    let trigger = RefreshTrigger::new();
    let refresh_task = refresh::spawn(
        enumerator,
        RefreshSettings::new(&cli.target, policy, &config.refresh),
        trigger.clone(),
        tx.clone(),
    );

    let app = App::new(
        cli.target.clone(),
        Arc::new(catalog),
        &config,
        Box::new(SystemClipboard::new()),
        logs,
    )
    .with_refresh(trigger);

    let result = tokio::task::spawn_blocking(move || ui::run(app, rx, tx)).await?;
    refresh_task.abort();

    let app = result?;
    info!(rules = app.document().rules().len(), "Exiting");

    Ok(())
}

/// First enumeration before the UI starts
///
/// A failing enumerator starts the UI with an empty catalog so the refresh
/// task can retry. A malformed line under the abort policy is fatal.
async fn initial_catalog(
    enumerator: &CommandEnumerator,
    target: &str,
    policy: ParsePolicy,
) -> AppResult<Catalog> {
    match fetch_catalog(enumerator, target, policy).await {
        Ok(build) => {
            info!(
                domains = build.catalog.len(),
                beans = build.catalog.bean_count(),
                skipped = build.skipped.len(),
                "Initial catalog loaded"
            );
            Ok(build.catalog)
        }
        Err(e @ EnumerationError::Rejected(_)) => Err(e.into()),
        Err(e) => {
            error!(error = %e, "Initial enumeration failed, waiting for refresh");
            Ok(Catalog::empty())
        }
    }
}
