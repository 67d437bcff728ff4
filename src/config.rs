//! Configuration management and validation.
//!
//! Provides the immutable run configuration: verification window, source
//! and station declarations, comparison pairs, external tool commands,
//! directory layout, and processing options. Loaded from a TOML file with
//! CLI overrides applied afterwards; validated once before any unit runs.

use crate::constants::{DEFAULT_CONFIG_FILENAME, DEFAULT_PARALLEL_UNITS, DRIVER_DATETIME_FORMAT};
use crate::{Error, Result};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Complete run configuration for the TAF processor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Verification window the run covers
    #[serde(default)]
    pub window: WindowConfig,

    /// Forecast sources to decode and load
    #[serde(default)]
    pub sources: Vec<SourceEntry>,

    /// Stations the statistics phase verifies
    #[serde(default)]
    pub stations: Vec<StationEntry>,

    /// Statistics phase settings
    #[serde(default)]
    pub verification: VerificationConfig,

    /// External TAF decoder invocation
    #[serde(default)]
    pub decoder: ExternalToolConfig,

    /// External statistics driver invocation
    #[serde(default)]
    pub driver: ExternalToolConfig,

    /// Directory layout
    #[serde(default)]
    pub paths: PathsConfig,

    /// Processing options
    #[serde(default)]
    pub processing: ProcessingConfig,
}

/// Half-open verification window [start, end)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Default for WindowConfig {
    fn default() -> Self {
        let epoch = NaiveDate::from_ymd_opt(2000, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap_or_default();
        Self {
            start: epoch,
            end: epoch,
        }
    }
}

impl WindowConfig {
    /// Validate that the window is non-empty
    pub fn validate(&self) -> Result<()> {
        if self.start >= self.end {
            return Err(Error::configuration(format!(
                "Verification window is empty: start {} is not before end {}",
                self.start, self.end
            )));
        }
        Ok(())
    }

    /// Month keys (YYYYMM) the window intersects, in order
    ///
    /// The first and last month may be partially covered; `month_bounds`
    /// returns the clamped bounds for those.
    pub fn months(&self) -> Vec<String> {
        let mut months = Vec::new();
        let mut year = self.start.year();
        let mut month = self.start.month();

        loop {
            let month_start = match NaiveDate::from_ymd_opt(year, month, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
            {
                Some(dt) => dt,
                None => break,
            };
            if month_start >= self.end {
                break;
            }
            months.push(format!("{:04}{:02}", year, month));

            if month == 12 {
                year += 1;
                month = 1;
            } else {
                month += 1;
            }
        }

        months
    }

    /// Window bounds clamped to one month key
    pub fn month_bounds(&self, month_key: &str) -> Result<(NaiveDateTime, NaiveDateTime)> {
        let (year, month) = parse_month_key(month_key)?;

        let month_start = NaiveDate::from_ymd_opt(year, month, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .ok_or_else(|| {
                Error::configuration(format!("Month key '{}' is out of range", month_key))
            })?;
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        let month_end = NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .ok_or_else(|| {
                Error::configuration(format!("Month key '{}' is out of range", month_key))
            })?;

        let clamped_start = self.start.max(month_start);
        let clamped_end = self.end.min(month_end);

        if clamped_start >= clamped_end {
            return Err(Error::configuration(format!(
                "Month {} does not intersect the verification window",
                month_key
            )));
        }

        Ok((clamped_start, clamped_end))
    }

    /// Clamped month bounds formatted as the statistics driver expects
    pub fn driver_bounds(&self, month_key: &str) -> Result<(String, String)> {
        let (start, end) = self.month_bounds(month_key)?;
        Ok((
            start.format(DRIVER_DATETIME_FORMAT).to_string(),
            end.format(DRIVER_DATETIME_FORMAT).to_string(),
        ))
    }
}

fn parse_month_key(month_key: &str) -> Result<(i32, u32)> {
    if month_key.len() != 6 || !month_key.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::configuration(format!(
            "Invalid month key '{}': expected YYYYMM",
            month_key
        )));
    }
    let year: i32 = month_key[..4]
        .parse()
        .map_err(|_| Error::configuration(format!("Invalid year in month key '{}'", month_key)))?;
    let month: u32 = month_key[4..]
        .parse()
        .map_err(|_| Error::configuration(format!("Invalid month in month key '{}'", month_key)))?;
    if !(1..=12).contains(&month) {
        return Err(Error::configuration(format!(
            "Invalid month in month key '{}': must be 01-12",
            month_key
        )));
    }
    Ok((year, month))
}

/// One declared forecast source, as the configuration file spells it
///
/// Raw strings only; the source registry turns these into validated
/// `SourceType` values before the run starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceEntry {
    pub code: String,
    pub label: String,
    pub bulletin_glob: String,
}

/// One declared verification station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationEntry {
    pub icao: String,

    /// Display name; defaults to the ICAO identifier when omitted
    #[serde(default)]
    pub name: String,

    pub horizon_hours: u8,
}

/// Statistics phase settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VerificationConfig {
    /// Concatenated pair codes (e.g. "o2x2"), resolved against the
    /// source registry before the run starts
    #[serde(default)]
    pub pairs: Vec<String>,
}

/// Invocation of an external tool
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalToolConfig {
    /// Executable to run
    #[serde(default)]
    pub command: PathBuf,

    /// Extra arguments placed before the contract arguments
    #[serde(default)]
    pub args: Vec<String>,
}

impl ExternalToolConfig {
    fn validate(&self, tool: &str) -> Result<()> {
        if self.command.as_os_str().is_empty() {
            return Err(Error::configuration(format!(
                "No {} command configured",
                tool
            )));
        }
        Ok(())
    }
}

/// Directory layout for the run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Per-unit decoder working directories live under here
    pub work_dir: PathBuf,

    /// Per-source SQLite stores live under here
    pub store_dir: PathBuf,

    /// Statistics artifacts and generated driver configs live under here
    pub artifact_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("work"),
            store_dir: PathBuf::from("stores"),
            artifact_dir: PathBuf::from("artifacts"),
        }
    }
}

/// Processing options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Batch units processed concurrently
    pub parallel_units: usize,

    /// How unparseable decoder date tokens are handled
    pub date_policy: DatePolicy,

    /// Remove concatenated bulletin inputs after a unit loads successfully
    #[serde(default)]
    pub clean_inputs: bool,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            parallel_units: DEFAULT_PARALLEL_UNITS,
            date_policy: DatePolicy::default(),
            clean_inputs: false,
        }
    }
}

/// Policy for decoder date tokens that fail to parse
///
/// Lenient is the production default: a bad token loads as the invalid
/// date sentinel and the row survives. Strict fails the unit instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatePolicy {
    #[default]
    Lenient,
    Strict,
}

impl Config {
    /// Default configuration file location, relative to the working directory
    pub fn default_config_path() -> PathBuf {
        PathBuf::from(DEFAULT_CONFIG_FILENAME)
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        toml::from_str(&contents).map_err(|e| {
            Error::configuration(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Load configuration using the layered approach (file, then CLI overrides)
    ///
    /// An explicitly named file must exist. Without one, the default
    /// location is used when present, otherwise defaults apply and
    /// validation reports what is missing.
    pub fn load_layered(config_file: Option<&Path>) -> Result<Self> {
        match config_file {
            Some(path) => Self::load(path),
            None => {
                let default_path = Self::default_config_path();
                if default_path.exists() {
                    Self::load(&default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Validate the configuration before any unit runs
    ///
    /// Pair resolution against the source registry happens separately,
    /// also before the run starts.
    pub fn validate(&self) -> Result<()> {
        self.window.validate()?;

        if self.sources.is_empty() {
            return Err(Error::configuration("No sources configured"));
        }

        let mut seen_codes = HashSet::new();
        for entry in &self.sources {
            // Builds a typed SourceType, which validates code, label, and glob
            let source = crate::app::models::SourceType::new(
                entry.code.clone(),
                entry.label.clone(),
                entry.bulletin_glob.clone(),
            )?;
            if !seen_codes.insert(source.code.clone()) {
                return Err(Error::configuration(format!(
                    "Duplicate source code '{}'",
                    source.code
                )));
            }
        }

        let mut seen_icaos = HashSet::new();
        for entry in &self.stations {
            let station = entry.to_station()?;
            if !seen_icaos.insert(station.icao.clone()) {
                return Err(Error::configuration(format!(
                    "Duplicate station '{}'",
                    station.icao
                )));
            }
        }

        self.decoder.validate("decoder")?;

        if !self.verification.pairs.is_empty() {
            self.driver.validate("statistics driver")?;
            if self.stations.is_empty() {
                return Err(Error::configuration(
                    "Pairs are configured but no stations are",
                ));
            }
        }

        if self.processing.parallel_units == 0 {
            return Err(Error::configuration(
                "parallel_units must be greater than 0",
            ));
        }
        if self.processing.parallel_units > 64 {
            return Err(Error::configuration("parallel_units cannot exceed 64"));
        }

        Ok(())
    }

    /// Create the work, store, and artifact directories
    pub fn ensure_directories(&self) -> Result<()> {
        for dir in [
            &self.paths.work_dir,
            &self.paths.store_dir,
            &self.paths.artifact_dir,
        ] {
            std::fs::create_dir_all(dir).map_err(|e| {
                Error::configuration(format!(
                    "Failed to create directory '{}': {}",
                    dir.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Path of one source's SQLite store
    pub fn store_path(&self, code: &crate::app::models::SourceCode) -> PathBuf {
        self.paths.store_dir.join(code.store_filename())
    }

    /// Set the window bounds
    pub fn with_window(mut self, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        self.window = WindowConfig { start, end };
        self
    }

    /// Set the number of concurrently processed units
    pub fn with_parallel_units(mut self, parallel_units: usize) -> Self {
        self.processing.parallel_units = parallel_units;
        self
    }

    /// Set the date token policy
    pub fn with_date_policy(mut self, policy: DatePolicy) -> Self {
        self.processing.date_policy = policy;
        self
    }
}

impl StationEntry {
    /// Build the validated station, defaulting the name to the ICAO
    pub fn to_station(&self) -> Result<crate::app::models::Station> {
        let name = if self.name.trim().is_empty() {
            self.icao.clone()
        } else {
            self.name.clone()
        };
        crate::app::models::Station::new(self.icao.clone(), name, self.horizon_hours)
    }
}
