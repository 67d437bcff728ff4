//! Verify command implementation: statistics driver phase on existing stores

use super::shared::{load_run_configuration, print_run_summary, setup_logging};
use crate::Result;
use crate::app::services::orchestrator::{Orchestrator, RunReport};
use crate::cli::args::RunArgs;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Drive the statistics tool over already-loaded stores
pub async fn run_verify(args: RunArgs, cancellation: CancellationToken) -> Result<RunReport> {
    let start_time = Instant::now();

    setup_logging(args.get_log_level(), args.quiet)?;

    info!("Starting TAF processor verification phase");
    debug!("Command line arguments: {:?}", args);

    args.validate()?;
    let config = Arc::new(load_run_configuration(&args)?);

    let orchestrator = Orchestrator::new(config.clone(), cancellation)?;

    // The driver opens the stores itself; an absent store means the load
    // phase has not run for that source yet.
    for pair in orchestrator.pairs() {
        for code in [&pair.reference, &pair.candidate] {
            let store_path = config.store_path(code);
            if !store_path.exists() {
                warn!(
                    "Store for source '{}' not found at {}; run the load phase first",
                    code,
                    store_path.display()
                );
            }
        }
    }

    let mut report = RunReport::default();
    orchestrator
        .run_verify_phase(&mut report, args.show_progress())
        .await?;

    if !args.quiet {
        print_run_summary(&report, start_time.elapsed());
    }

    Ok(report)
}
