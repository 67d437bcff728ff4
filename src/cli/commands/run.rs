//! Run command implementation: both pipeline phases in sequence

use super::shared::{load_run_configuration, print_run_summary, setup_logging};
use crate::Result;
use crate::app::services::orchestrator::{Orchestrator, RunReport};
use crate::cli::args::RunArgs;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Decode and load every unit, then drive the statistics phase
pub async fn run_pipeline(args: RunArgs, cancellation: CancellationToken) -> Result<RunReport> {
    let start_time = Instant::now();

    setup_logging(args.get_log_level(), args.quiet)?;

    info!("Starting TAF processor run");
    debug!("Command line arguments: {:?}", args);

    args.validate()?;
    let config = load_run_configuration(&args)?;

    let orchestrator = Orchestrator::new(Arc::new(config), cancellation)?;
    let report = orchestrator.run(args.show_progress()).await?;

    if !args.quiet {
        print_run_summary(&report, start_time.elapsed());
    }

    Ok(report)
}
