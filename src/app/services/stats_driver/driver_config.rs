//! Generation of per-pair driver configuration files

use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::app::models::SourcePair;
use crate::config::Config;
use crate::constants::driver_config_filename;
use crate::{Error, Result};

/// Write the configuration file the driver reads for one pair
///
/// The driver takes an INI file with a single `[defaults]` section. The
/// file is regenerated on every verification run so the connection
/// strings always point at the current store layout: the candidate store
/// is the forecast side under test, the reference store the baseline it
/// is verified against.
pub fn write_driver_config(config: &Config, pair: &SourcePair) -> Result<PathBuf> {
    let path = config
        .paths
        .artifact_dir
        .join(driver_config_filename(&pair.code()));

    fs::write(&path, driver_config_content(config, pair)).map_err(|e| {
        Error::io(
            format!("Failed to write driver config {}", path.display()),
            e,
        )
    })?;

    debug!("Wrote driver config {}", path.display());
    Ok(path)
}

fn driver_config_content(config: &Config, pair: &SourcePair) -> String {
    let candidate_store = config.store_path(&pair.candidate);
    let reference_store = config.store_path(&pair.reference);

    format!(
        "[defaults]\n\
         taf_connection_string = sqlite:///{candidate}\n\
         reference_connection_string = sqlite:///{reference}\n\
         table_schema = cfsb\n\
         taf_table = taf_decoded_data\n\
         rawtaf_table = taf_data\n\
         extract_lookahead = 3\n\
         sql_debug = False\n\
         vis_cats = Category.from_thresh([350, 800, 1500, 5000, 10000])\n\
         clb_cats = Category.from_thresh([200, 500, 1000, 1500])\n\
         ft_to_m = 0.3048\n\
         use_autometars = True\n\
         use_specis = False\n\
         probbins = Problist([0.0, 0.3, 0.4, 0.6, 0.7, 1.0])\n\
         probbins_uncertainty = Problist([0.00, 0.05, 0.10, 0.15, 0.20, 0.25, \
         0.30, 0.35, 0.40, 0.45, 0.50, 0.55, 0.60, 0.65, 0.70, 0.75, 0.80, \
         0.85, 0.90, 0.95, 1.00])\n\
         vis_verpy_str = vis\n\
         clb_verpy_str = cbh|5.0\n\
         metars_per_hour = 2\n",
        candidate = candidate_store.display(),
        reference = reference_store.display(),
    )
}
