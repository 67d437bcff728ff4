//! Command-line argument definitions for the TAF processor
//!
//! This module defines the complete CLI interface using clap derive API.
//! Every pipeline knob defaults to the configuration file value; flags
//! given here override the file after it loads.

use crate::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;

/// CLI arguments for the TAF processor
///
/// Decodes archived TAF bulletins through the external decoder, loads the
/// normalized output into per-source SQLite stores, and drives the
/// verification statistics tool per comparison pair.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "taf-processor",
    version,
    about = "Decode archived TAF bulletins into per-source SQLite stores and run forecast verification",
    long_about = "A batch pipeline that concatenates archived TAF bulletins per (source, month) unit, \
                  drives the external TAF decoder, normalizes its CSV output into per-source SQLite \
                  stores with idempotent replace-on-conflict loading, and then runs the external \
                  verification statistics driver once per (pair, station, month) cell."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands for the TAF processor
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Run both phases: decode and load every unit, then drive statistics
    Run(RunArgs),
    /// Decode bulletins and load the per-source stores (phase 1 only)
    Load(RunArgs),
    /// Drive the statistics tool over already-loaded stores (phase 2 only)
    Verify(RunArgs),
    /// Drop and recreate per-source stores, discarding loaded data
    Reset(ResetArgs),
    /// Report row counts per source store
    Report(ReportArgs),
}

/// Arguments shared by the pipeline commands (run, load, verify)
#[derive(Debug, Clone, Parser)]
pub struct RunArgs {
    /// Path to configuration file
    ///
    /// TOML configuration file naming the sources, stations, pairs,
    /// window, and external tools. If not specified, looks for
    /// ./taf-processor.toml.
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Verification window start override
    ///
    /// Accepts YYYY-MM-DD (midnight) or "YYYY-MM-DD HH:MM". Overrides
    /// the [window] start from the configuration file.
    #[arg(
        long = "start",
        value_name = "DATETIME",
        help = "Verification window start (YYYY-MM-DD or \"YYYY-MM-DD HH:MM\")"
    )]
    pub window_start: Option<String>,

    /// Verification window end override (exclusive)
    #[arg(
        long = "end",
        value_name = "DATETIME",
        help = "Verification window end, exclusive (YYYY-MM-DD or \"YYYY-MM-DD HH:MM\")"
    )]
    pub window_end: Option<String>,

    /// Number of batch units processed concurrently
    #[arg(
        short = 'j',
        long = "parallel-units",
        value_name = "COUNT",
        help = "Number of (source, month) units processed concurrently"
    )]
    pub parallel_units: Option<usize>,

    /// Fail a unit on unparseable decoder date tokens
    ///
    /// By default a bad date token loads as the invalid-date sentinel and
    /// the row survives. This flag makes the same token fail the unit.
    #[arg(
        long = "strict-dates",
        help = "Fail a unit on unparseable decoder date tokens instead of loading the sentinel"
    )]
    pub strict_dates: bool,

    /// Remove concatenated bulletin inputs after a unit loads
    #[arg(
        long = "clean-inputs",
        help = "Remove concatenated decoder inputs after a unit loads successfully"
    )]
    pub clean_inputs: bool,

    /// Working directory for per-unit decoder inputs and outputs
    #[arg(
        long = "work-dir",
        value_name = "PATH",
        help = "Working directory for per-unit decoder inputs and outputs"
    )]
    pub work_dir: Option<PathBuf>,

    /// Directory holding the per-source SQLite stores
    #[arg(
        long = "store-dir",
        value_name = "PATH",
        help = "Directory holding the per-source SQLite stores"
    )]
    pub store_dir: Option<PathBuf>,

    /// Directory for statistics artifacts and generated driver configs
    #[arg(
        long = "artifact-dir",
        value_name = "PATH",
        help = "Directory for statistics artifacts and generated driver configs"
    )]
    pub artifact_dir: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    ///
    /// Only show errors and critical messages. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Arguments for the reset command
#[derive(Debug, Clone, Parser)]
pub struct ResetArgs {
    /// Path to configuration file
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Directory holding the per-source SQLite stores
    #[arg(
        long = "store-dir",
        value_name = "PATH",
        help = "Directory holding the per-source SQLite stores"
    )]
    pub store_dir: Option<PathBuf>,

    /// Specific sources to reset (comma-separated codes)
    ///
    /// If not specified, every configured source store is reset.
    #[arg(
        short = 's',
        long = "sources",
        value_name = "LIST",
        help = "Comma-separated source codes to reset (default: all configured)"
    )]
    pub sources: Option<SourceList>,

    /// Confirm the reset
    ///
    /// Resetting discards every loaded forecast; the command refuses to
    /// run without this flag.
    #[arg(short = 'y', long = "yes", help = "Confirm discarding all loaded data")]
    pub yes: bool,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,
}

/// Arguments for the report command
#[derive(Debug, Clone, Parser)]
pub struct ReportArgs {
    /// Path to configuration file
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Directory holding the per-source SQLite stores
    #[arg(
        long = "store-dir",
        value_name = "PATH",
        help = "Directory holding the per-source SQLite stores"
    )]
    pub store_dir: Option<PathBuf>,

    /// Specific sources to report on (comma-separated codes)
    #[arg(
        short = 's',
        long = "sources",
        value_name = "LIST",
        help = "Comma-separated source codes to report on (default: all configured)"
    )]
    pub sources: Option<SourceList>,

    /// Output format for the report
    #[arg(
        long = "format",
        value_enum,
        default_value = "human",
        help = "Output format for the report"
    )]
    pub output_format: OutputFormat,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,
}

/// Output format options for machine-readable results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
    /// CSV format for data analysis
    Csv,
}

/// Wrapper for parsing comma-separated source code lists
#[derive(Debug, Clone)]
pub struct SourceList {
    pub codes: Vec<String>,
}

impl FromStr for SourceList {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let codes: Vec<String> = s
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if codes.is_empty() {
            return Err(Error::configuration("Source list cannot be empty"));
        }

        // Shape validation only; registry membership is checked against
        // the loaded configuration by the command.
        for code in &codes {
            crate::app::models::SourceCode::new(code.clone())?;
        }

        Ok(SourceList { codes })
    }
}

/// Parse a window bound given on the command line
///
/// Accepts a bare date (midnight) or a date with minute precision.
pub fn parse_window_bound(value: &str) -> Result<NaiveDateTime> {
    let trimmed = value.trim();

    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M") {
        return Ok(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M") {
        return Ok(dt);
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt);
        }
    }

    Err(Error::configuration(format!(
        "Invalid window bound '{}': expected YYYY-MM-DD or \"YYYY-MM-DD HH:MM\"",
        value
    )))
}

impl Args {
    /// Get the command if one was specified
    pub fn get_command(&self) -> Commands {
        self.command
            .clone()
            .expect("Command should be present when get_command() is called")
    }
}

impl RunArgs {
    /// Validate the pipeline command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if let Some(config_file) = &self.config_file {
            if !config_file.exists() {
                return Err(Error::configuration(format!(
                    "Config file does not exist: {}",
                    config_file.display()
                )));
            }
        }

        if let Some(parallel_units) = self.parallel_units {
            if parallel_units == 0 {
                return Err(Error::configuration(
                    "Number of parallel units must be greater than 0",
                ));
            }
            if parallel_units > 64 {
                return Err(Error::configuration(
                    "Number of parallel units cannot exceed 64",
                ));
            }
        }

        if let Some(start) = &self.window_start {
            parse_window_bound(start)?;
        }
        if let Some(end) = &self.window_end {
            parse_window_bound(end)?;
        }

        Ok(())
    }

    /// Parsed window start override, if one was given
    pub fn parse_window_start(&self) -> Result<Option<NaiveDateTime>> {
        self.window_start
            .as_deref()
            .map(parse_window_bound)
            .transpose()
    }

    /// Parsed window end override, if one was given
    pub fn parse_window_end(&self) -> Result<Option<NaiveDateTime>> {
        self.window_end
            .as_deref()
            .map(parse_window_bound)
            .transpose()
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

impl ResetArgs {
    /// Validate the reset command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if let Some(config_file) = &self.config_file {
            if !config_file.exists() {
                return Err(Error::configuration(format!(
                    "Config file does not exist: {}",
                    config_file.display()
                )));
            }
        }
        Ok(())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

impl ReportArgs {
    /// Validate the report command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if let Some(config_file) = &self.config_file {
            if !config_file.exists() {
                return Err(Error::configuration(format!(
                    "Config file does not exist: {}",
                    config_file.display()
                )));
            }
        }
        Ok(())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            config_file: None,
            window_start: None,
            window_end: None,
            parallel_units: None,
            strict_dates: false,
            clean_inputs: false,
            work_dir: None,
            store_dir: None,
            artifact_dir: None,
            verbose: 0,
            quiet: false,
        }
    }
}
