//! Command implementations for the TAF processor CLI
//!
//! This module contains the main command execution logic, progress reporting,
//! and error handling for the CLI interface. Each command is implemented in
//! its own module for better organization and maintainability.

pub mod load;
pub mod report;
pub mod reset;
pub mod run;
pub mod shared;
pub mod verify;

// Re-export the helpers main() consults for exit handling
pub use shared::is_critical_error;

use crate::Result;
use crate::app::services::orchestrator::RunReport;
use crate::cli::args::{Args, Commands};
use tokio_util::sync::CancellationToken;

/// Main command runner for the TAF processor
///
/// This function dispatches to the appropriate subcommand handler based on
/// CLI args. Each command is implemented in its own module:
/// - `run`: decode, load, and verify in one pass
/// - `load`: decode and load only
/// - `verify`: statistics driver phase over existing stores
/// - `reset`: drop and recreate per-source stores
/// - `report`: row counts for loaded stores
///
/// The maintenance commands return an empty report so the exit-code logic
/// in main() treats them as clean whenever they return Ok.
pub async fn run(args: Args, cancellation: CancellationToken) -> Result<RunReport> {
    match args.get_command() {
        Commands::Run(run_args) => run::run_pipeline(run_args, cancellation).await,
        Commands::Load(load_args) => load::run_load(load_args, cancellation).await,
        Commands::Verify(verify_args) => verify::run_verify(verify_args, cancellation).await,
        Commands::Reset(reset_args) => {
            reset::run_reset(reset_args)?;
            Ok(RunReport::default())
        }
        Commands::Report(report_args) => {
            report::run_report(report_args)?;
            Ok(RunReport::default())
        }
    }
}
