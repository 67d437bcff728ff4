//! Statistics driver integration
//!
//! Once the stores are loaded, the external statistics driver runs once
//! per (pair, station, month). Its CLI contract is nine positional
//! arguments: window start and end (YYYYMMDDHHMM), station ICAO,
//! verification period in hours, the four artifact output paths, and
//! the pair's generated configuration file. A failed invocation is
//! recorded against that cell only; the rest of the phase continues.

use std::fs;
use std::path::PathBuf;

use tokio::process::Command;
use tracing::{debug, info};

use crate::app::models::{SourcePair, Station};
use crate::config::{Config, ExternalToolConfig};
use crate::constants::driver_config_filename;
use crate::{Error, Result};

pub mod artifacts;
pub mod driver_config;

#[cfg(test)]
pub mod tests;

pub use artifacts::ArtifactSet;
pub use driver_config::write_driver_config;

/// One driver invocation, fully resolved against the run configuration
#[derive(Debug, Clone)]
pub struct DriverInvocation {
    pub pair_code: String,
    pub icao: String,
    pub month_key: String,

    /// Clamped window bounds, formatted YYYYMMDDHHMM
    pub window_start: String,
    pub window_end: String,

    pub horizon_hours: u8,

    /// Directory holding this pair's artifacts and captured logs
    pub pair_dir: PathBuf,

    /// Generated `<pair>.cfg` the driver reads
    pub config_path: PathBuf,

    pub artifacts: ArtifactSet,
}

impl DriverInvocation {
    /// Resolve one (pair, station, month) cell
    pub fn resolve(
        config: &Config,
        pair: &SourcePair,
        station: &Station,
        month_key: &str,
    ) -> Result<Self> {
        let (window_start, window_end) = config.window.driver_bounds(month_key)?;
        let pair_code = pair.code();
        let pair_dir = config.paths.artifact_dir.join(&pair_code);

        Ok(Self {
            artifacts: ArtifactSet::new(&pair_dir, &station.icao, month_key),
            config_path: config
                .paths
                .artifact_dir
                .join(driver_config_filename(&pair_code)),
            pair_code,
            icao: station.icao.clone(),
            month_key: month_key.to_string(),
            window_start,
            window_end,
            horizon_hours: station.horizon_hours,
            pair_dir,
        })
    }

    /// Short label for logs and reports
    pub fn label(&self) -> String {
        format!("{}/{}/{}", self.pair_code, self.icao, self.month_key)
    }

    pub fn stdout_log(&self) -> PathBuf {
        self.pair_dir
            .join(format!("{}_{}_stdout.log", self.icao, self.month_key))
    }

    pub fn stderr_log(&self) -> PathBuf {
        self.pair_dir
            .join(format!("{}_{}_stderr.log", self.icao, self.month_key))
    }
}

/// Runner for the external statistics driver executable
#[derive(Debug, Clone)]
pub struct StatsDriver {
    command: PathBuf,
    base_args: Vec<String>,
}

impl StatsDriver {
    pub fn new(config: &ExternalToolConfig) -> Self {
        Self {
            command: config.command.clone(),
            base_args: config.args.clone(),
        }
    }

    /// Run one invocation, capturing stdout/stderr next to the artifacts
    pub async fn run(&self, invocation: &DriverInvocation) -> Result<()> {
        fs::create_dir_all(&invocation.pair_dir)
            .map_err(|e| Error::io("Failed to create pair artifact directory", e))?;

        info!(
            "Running statistics driver for {} over [{}, {})",
            invocation.label(),
            invocation.window_start,
            invocation.window_end
        );
        debug!(
            "Driver config {} with horizon {} hours",
            invocation.config_path.display(),
            invocation.horizon_hours
        );

        let output = Command::new(&self.command)
            .args(&self.base_args)
            .arg(&invocation.window_start)
            .arg(&invocation.window_end)
            .arg(&invocation.icao)
            .arg(invocation.horizon_hours.to_string())
            .arg(&invocation.artifacts.vis)
            .arg(&invocation.artifacts.clb)
            .arg(&invocation.artifacts.vis_uncertainty)
            .arg(&invocation.artifacts.clb_uncertainty)
            .arg(&invocation.config_path)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                Error::io(
                    format!("Failed to launch statistics driver {}", self.command.display()),
                    e,
                )
            })?;

        fs::write(invocation.stdout_log(), &output.stdout)
            .map_err(|e| Error::io("Failed to write driver stdout log", e))?;
        fs::write(invocation.stderr_log(), &output.stderr)
            .map_err(|e| Error::io("Failed to write driver stderr log", e))?;

        if !output.status.success() {
            return Err(Error::stats_driver(
                &invocation.pair_code,
                &invocation.icao,
                &invocation.month_key,
                format!(
                    "Driver exited with {} (stderr captured in {})",
                    output.status,
                    invocation.stderr_log().display()
                ),
            ));
        }
        Ok(())
    }
}
