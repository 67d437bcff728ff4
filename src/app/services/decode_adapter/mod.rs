//! Decode adapter wrapping the external TAF decoder
//!
//! The decoder is a black box with a fixed CLI contract: given
//! `-i INPUTDIR -o OUTPUTDIR` it reads `INPUTDIR/tafs.txt` and writes
//! `acceptedTafs.csv`, `decodedTafs.csv` and `rejectedTafs.txt` into
//! `OUTPUTDIR`. This service assembles the input file from raw
//! bulletins, runs the decoder with captured stdout/stderr, and checks
//! that both output CSVs exist. A decoder problem of any kind surfaces
//! as `DecodeFailure` scoped to the unit.

use std::fs;
use std::path::PathBuf;

use tokio::process::Command;
use tracing::{debug, info};

use crate::app::models::SourceType;
use crate::config::ExternalToolConfig;
use crate::{Error, Result};

pub mod bulletins;
pub mod workdir;

#[cfg(test)]
pub mod tests;

pub use workdir::UnitWorkDir;

/// Paths to one unit's decoder output, ready for loading
#[derive(Debug, Clone)]
pub struct DecodeOutput {
    /// Accepted-forecast header CSV
    pub accepted_path: PathBuf,

    /// Decoded-element CSV
    pub decoded_path: PathBuf,

    /// Reject side file, when the decoder wrote one
    pub rejected_path: Option<PathBuf>,

    /// Raw bulletin files that went into the input
    pub bulletin_count: usize,
}

/// Runner for the external decoder executable
#[derive(Debug, Clone)]
pub struct DecodeAdapter {
    command: PathBuf,
    base_args: Vec<String>,
}

impl DecodeAdapter {
    pub fn new(config: &ExternalToolConfig) -> Self {
        Self {
            command: config.command.clone(),
            base_args: config.args.clone(),
        }
    }

    /// Decode one unit's bulletins into the unit work directory
    ///
    /// A month with no matching bulletins is a `DecodeFailure` like any
    /// other: the unit fails, the run continues.
    pub async fn decode_unit(
        &self,
        source: &SourceType,
        month_key: &str,
        unit: &UnitWorkDir,
    ) -> Result<DecodeOutput> {
        let bulletins = bulletins::collect_bulletins(source, month_key)?;
        if bulletins.is_empty() {
            return Err(Error::decode_failure(
                source.code.as_str(),
                month_key,
                format!(
                    "No bulletins matched '{}'",
                    source.bulletin_glob_for(month_key)
                ),
            ));
        }

        unit.prepare()?;
        let input_bytes = bulletins::write_bulletin_input(unit, &bulletins)?;
        info!(
            "Decoding {} bulletins ({} bytes) for {}/{}",
            bulletins.len(),
            input_bytes,
            source.code,
            month_key
        );

        self.run_decoder(source, month_key, unit).await?;
        self.check_outputs(source, month_key, unit, bulletins.len())
    }

    async fn run_decoder(
        &self,
        source: &SourceType,
        month_key: &str,
        unit: &UnitWorkDir,
    ) -> Result<()> {
        debug!(
            "Running decoder {} for {}/{}",
            self.command.display(),
            source.code,
            month_key
        );

        let output = Command::new(&self.command)
            .args(&self.base_args)
            .arg("-i")
            .arg(unit.input_dir())
            .arg("-o")
            .arg(unit.output_dir())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                Error::io(
                    format!("Failed to launch decoder {}", self.command.display()),
                    e,
                )
            })?;

        fs::write(unit.stdout_log(), &output.stdout)
            .map_err(|e| Error::io("Failed to write decoder stdout log", e))?;
        fs::write(unit.stderr_log(), &output.stderr)
            .map_err(|e| Error::io("Failed to write decoder stderr log", e))?;

        if !output.status.success() {
            return Err(Error::decode_failure(
                source.code.as_str(),
                month_key,
                format!(
                    "Decoder exited with {} (stderr captured in {})",
                    output.status,
                    unit.stderr_log().display()
                ),
            ));
        }
        Ok(())
    }

    fn check_outputs(
        &self,
        source: &SourceType,
        month_key: &str,
        unit: &UnitWorkDir,
        bulletin_count: usize,
    ) -> Result<DecodeOutput> {
        let accepted_path = unit.accepted_file();
        let decoded_path = unit.decoded_file();
        for path in [&accepted_path, &decoded_path] {
            if !path.is_file() {
                return Err(Error::decode_failure(
                    source.code.as_str(),
                    month_key,
                    format!("Decoder did not write {}", path.display()),
                ));
            }
        }

        let rejected = unit.rejected_file();
        Ok(DecodeOutput {
            accepted_path,
            decoded_path,
            rejected_path: rejected.is_file().then_some(rejected),
            bulletin_count,
        })
    }
}
