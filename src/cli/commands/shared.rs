//! Shared components for CLI commands
//!
//! Configuration loading with CLI overrides, logging setup, source
//! selection, and the colored run summary used by the pipeline commands.

use crate::app::models::SourceType;
use crate::app::services::orchestrator::RunReport;
use crate::app::services::source_registry::SourceRegistry;
use crate::cli::args::{RunArgs, SourceList};
use crate::config::{Config, DatePolicy};
use crate::{Error, Result};
use colored::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Set up structured logging for a command
///
/// `RUST_LOG` wins when set; otherwise the verbosity flags pick the
/// level for this crate's targets.
pub fn setup_logging(log_level: &str, quiet: bool) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("taf_processor={}", log_level)));

    if quiet {
        // Minimal logging for quiet mode
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        // Standard logging with timestamps
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Resolve the configuration file to read, if any
///
/// An explicitly named file is used as given; otherwise the default
/// location applies when it exists.
fn resolve_config_file(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default_path = Config::default_config_path();
            default_path.exists().then_some(default_path)
        }
    }
}

/// Load configuration for a pipeline command (file, then CLI overrides)
pub fn load_run_configuration(args: &RunArgs) -> Result<Config> {
    info!("Loading configuration");

    let config_file = resolve_config_file(args.config_file.as_deref());
    if let Some(config_path) = &config_file {
        info!("Using config file: {}", config_path.display());
    } else {
        info!("No config file found, using built-in defaults");
    }

    let mut config = Config::load_layered(config_file.as_deref())?;
    apply_run_overrides(&mut config, args)?;
    config.validate()?;
    config.ensure_directories()?;

    Ok(config)
}

/// Apply pipeline CLI argument overrides to configuration
pub fn apply_run_overrides(config: &mut Config, args: &RunArgs) -> Result<()> {
    if let Some(start) = args.parse_window_start()? {
        config.window.start = start;
    }
    if let Some(end) = args.parse_window_end()? {
        config.window.end = end;
    }
    if let Some(parallel_units) = args.parallel_units {
        config.processing.parallel_units = parallel_units;
    }
    if args.strict_dates {
        config.processing.date_policy = DatePolicy::Strict;
    }
    if args.clean_inputs {
        config.processing.clean_inputs = true;
    }
    if let Some(work_dir) = &args.work_dir {
        config.paths.work_dir = work_dir.clone();
    }
    if let Some(store_dir) = &args.store_dir {
        config.paths.store_dir = store_dir.clone();
    }
    if let Some(artifact_dir) = &args.artifact_dir {
        config.paths.artifact_dir = artifact_dir.clone();
    }

    Ok(())
}

/// Load configuration for a store maintenance command (reset, report)
///
/// These commands touch only the stores, so they skip full pipeline
/// validation; the source registry still validates the source list.
pub fn load_store_configuration(
    config_file: Option<&Path>,
    store_dir: Option<&Path>,
) -> Result<Config> {
    let config_file = resolve_config_file(config_file);
    if let Some(config_path) = &config_file {
        info!("Using config file: {}", config_path.display());
    }

    let mut config = Config::load_layered(config_file.as_deref())?;
    if let Some(store_dir) = store_dir {
        config.paths.store_dir = store_dir.to_path_buf();
    }

    Ok(config)
}

/// Resolve the source selection for a store maintenance command
///
/// Without a filter every registered source is selected; with one, each
/// requested code must be registered.
pub fn selected_sources<'a>(
    registry: &'a SourceRegistry,
    filter: Option<&SourceList>,
) -> Result<Vec<&'a SourceType>> {
    match filter {
        None => Ok(registry.iter().collect()),
        Some(list) => list
            .codes
            .iter()
            .map(|code| registry.lookup(code))
            .collect(),
    }
}

/// Check if an error is critical enough to stop processing
///
/// Unit-scoped failures are reported per unit and the run continues;
/// these abort the whole run instead.
pub fn is_critical_error(error: &Error) -> bool {
    matches!(
        error,
        Error::Configuration { .. }
            | Error::UnknownSourceCode { .. }
            | Error::ProcessingInterrupted { .. }
    )
}

/// Print the colored end-of-run summary for the pipeline commands
pub fn print_run_summary(report: &RunReport, elapsed: std::time::Duration) {
    println!("\n{}", "Run Summary".bright_green().bold());
    println!(
        "  {} {}",
        "Time elapsed:".bright_cyan(),
        indicatif::HumanDuration(elapsed).to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Units done:".bright_cyan(),
        report.units_done().to_string().bright_white().bold()
    );
    if report.units_failed() > 0 {
        println!(
            "  {} {}",
            "Units failed:".bright_red(),
            report.units_failed().to_string().bright_red().bold()
        );
    }
    if report.units_skipped() > 0 {
        println!(
            "  {} {}",
            "Units skipped:".bright_yellow(),
            report.units_skipped().to_string().bright_yellow().bold()
        );
    }
    println!(
        "  {} {} headers, {} elements",
        "Rows loaded:".bright_cyan(),
        report.total_headers_loaded().to_string().bright_white(),
        report.total_elements_loaded().to_string().bright_white()
    );
    if !report.driver_invocations.is_empty() {
        println!(
            "  {} {} succeeded, {} failed",
            "Driver invocations:".bright_cyan(),
            report.invocations_succeeded().to_string().bright_white(),
            if report.invocations_failed() > 0 {
                report.invocations_failed().to_string().bright_red().bold()
            } else {
                "0".bright_white()
            }
        );
    }

    for unit in &report.units {
        if let Some(error) = &unit.error {
            println!(
                "  {} {}: {} (diagnostics in {})",
                "FAILED".bright_red().bold(),
                unit.label(),
                error,
                unit.diagnostics_dir.display()
            );
        }
    }
    for cell in &report.driver_invocations {
        if let Some(error) = &cell.error {
            println!(
                "  {} {}: {} (logs in {})",
                "FAILED".bright_red().bold(),
                cell.label(),
                error,
                cell.diagnostics_dir.display()
            );
        }
    }
    println!();
}
