//! Reset command implementation: drop and recreate per-source stores

use super::shared::{load_store_configuration, selected_sources, setup_logging};
use crate::app::models::SourceType;
use crate::app::services::source_registry::SourceRegistry;
use crate::app::services::store::TafStore;
use crate::cli::args::ResetArgs;
use crate::config::Config;
use crate::{Error, Result};
use colored::*;
use tracing::{debug, info};

/// Drop and recreate the stores for the selected sources
///
/// Requires the `--yes` flag; a reset discards every loaded header and
/// element for the selected sources. Re-running the load phase rebuilds
/// them from the bulletin files.
pub fn run_reset(args: ResetArgs) -> Result<()> {
    setup_logging(args.get_log_level(), false)?;

    info!("Starting TAF store reset");
    debug!("Command line arguments: {:?}", args);

    args.validate()?;

    if !args.yes {
        return Err(Error::configuration(
            "Resetting discards all loaded data for the selected sources; pass --yes to confirm",
        ));
    }

    let config = load_store_configuration(args.config_file.as_deref(), args.store_dir.as_deref())?;
    let registry = SourceRegistry::from_config(&config)?;
    let sources = selected_sources(&registry, args.sources.as_ref())?;

    config.ensure_directories()?;
    let count = reset_stores(&config, &sources)?;

    println!(
        "{} {} store(s)",
        "Reset".bright_green().bold(),
        count.to_string().bright_white().bold()
    );

    Ok(())
}

/// Reset one store per source, creating empty stores where none existed
fn reset_stores(config: &Config, sources: &[&SourceType]) -> Result<usize> {
    for source in sources {
        let store_path = config.store_path(&source.code);
        let store = TafStore::open(&store_path)?;
        store.reset()?;
        info!(
            "Reset store for source '{}' at {}",
            source.code,
            store_path.display()
        );
    }
    Ok(sources.len())
}
