//! Batch orchestration across (source, month) units
//!
//! Phase 1 fans the decode-and-load units out on a bounded worker pool.
//! Units are isolated: one failed unit is reported and the rest carry
//! on. Phase 2 walks the pair x station x month grid, invoking the
//! statistics driver once per cell and recording failures per cell.
//! Cancellation is cooperative throughout: units and cells that already
//! completed keep their data, unstarted ones stay pending.

use std::sync::Arc;

use futures::StreamExt;
use futures::stream;
use indicatif::{ProgressBar, ProgressStyle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::app::models::{SourcePair, Station};
use crate::app::services::decode_adapter::{DecodeAdapter, UnitWorkDir};
use crate::app::services::normalizer::Normalizer;
use crate::app::services::pair_selector::resolve_pairs;
use crate::app::services::source_registry::SourceRegistry;
use crate::app::services::station_registry::StationRegistry;
use crate::app::services::stats_driver::{DriverInvocation, StatsDriver, write_driver_config};
use crate::app::services::store::TafStore;
use crate::config::Config;
use crate::{Error, Result};

pub mod report;
pub mod unit;

#[cfg(test)]
pub mod tests;

pub use report::{DriverReport, RunReport};
pub use unit::{BatchUnit, UnitReport, UnitState};

/// Coordinates both pipeline phases for one validated run
pub struct Orchestrator {
    config: Arc<Config>,
    sources: SourceRegistry,
    stations: StationRegistry,
    pairs: Vec<SourcePair>,
    cancellation: CancellationToken,
}

impl Orchestrator {
    /// Validate the configuration and resolve every registry lookup
    ///
    /// All configuration problems surface here, before any unit runs.
    pub fn new(config: Arc<Config>, cancellation: CancellationToken) -> Result<Self> {
        config.validate()?;
        let sources = SourceRegistry::from_config(&config)?;
        let stations = StationRegistry::from_config(&config)?;
        let pairs = resolve_pairs(&sources, &config.verification.pairs)?;

        Ok(Self {
            config,
            sources,
            stations,
            pairs,
            cancellation,
        })
    }

    pub fn sources(&self) -> &SourceRegistry {
        &self.sources
    }

    pub fn pairs(&self) -> &[SourcePair] {
        &self.pairs
    }

    /// The (source, month) units this run covers, in registry order
    pub fn units(&self) -> Vec<BatchUnit> {
        let months = self.config.window.months();
        let mut units = Vec::new();
        for source in self.sources.iter() {
            for month_key in &months {
                units.push(BatchUnit::new(source.clone(), month_key.clone()));
            }
        }
        units
    }

    /// Run both phases: decode-and-load, then statistics
    pub async fn run(&self, show_progress: bool) -> Result<RunReport> {
        let mut report = self.run_load_phase(show_progress).await?;

        if self.cancellation.is_cancelled() {
            info!("Run cancelled, skipping statistics phase");
            return Ok(report);
        }

        self.run_verify_phase(&mut report, show_progress).await?;
        Ok(report)
    }

    /// Phase 1: decode and load every unit on a bounded pool
    pub async fn run_load_phase(&self, show_progress: bool) -> Result<RunReport> {
        let units = self.units();
        let parallel = self.config.processing.parallel_units;
        info!(
            "Running {} batch units ({} sources x {} months) across {} workers",
            units.len(),
            self.sources.source_count(),
            self.config.window.months().len(),
            parallel
        );

        let adapter = DecodeAdapter::new(&self.config.decoder);
        let normalizer = Normalizer::new(self.config.processing.date_policy);
        let progress = if show_progress && !units.is_empty() {
            Some(create_phase_progress_bar(
                units.len() as u64,
                "Decoding and loading units",
            ))
        } else {
            None
        };

        let mut unit_reports: Vec<UnitReport> = stream::iter(
            units
                .into_iter()
                .map(|unit| self.run_unit(unit, &adapter, &normalizer, progress.as_ref())),
        )
        .buffer_unordered(parallel)
        .collect()
        .await;

        if let Some(pb) = progress {
            pb.finish_with_message("Decode and load complete");
        }

        unit_reports.sort_by(|a, b| {
            (&a.source_code, &a.month_key).cmp(&(&b.source_code, &b.month_key))
        });

        let report = RunReport {
            units: unit_reports,
            driver_invocations: Vec::new(),
        };
        info!(
            "Load phase finished: {} done, {} failed, {} skipped",
            report.units_done(),
            report.units_failed(),
            report.units_skipped()
        );
        Ok(report)
    }

    /// Run one unit through decode and load, capturing its outcome
    async fn run_unit(
        &self,
        unit: BatchUnit,
        adapter: &DecodeAdapter,
        normalizer: &Normalizer,
        progress: Option<&ProgressBar>,
    ) -> UnitReport {
        let workdir = UnitWorkDir::new(
            &self.config.paths.work_dir,
            &unit.source.code,
            &unit.month_key,
        );
        let mut report = UnitReport::new(&unit, workdir.root().to_path_buf());

        if self.cancellation.is_cancelled() {
            debug!("Unit {} not started: run cancelled", unit.label());
            return report;
        }

        match self
            .execute_unit(&unit, &workdir, adapter, normalizer, &mut report)
            .await
        {
            Ok(()) => info!(
                "Unit {} done: {} headers, {} elements",
                unit.label(),
                report.headers_loaded,
                report.elements_loaded
            ),
            Err(e) => {
                error!("Unit {} failed: {}", unit.label(), e);
                report.fail(e.to_string());
            }
        }

        if let Some(pb) = progress {
            pb.inc(1);
        }
        report
    }

    async fn execute_unit(
        &self,
        unit: &BatchUnit,
        workdir: &UnitWorkDir,
        adapter: &DecodeAdapter,
        normalizer: &Normalizer,
        report: &mut UnitReport,
    ) -> Result<()> {
        report.state = UnitState::Decoding;
        let decoded = tokio::select! {
            _ = self.cancellation.cancelled() => {
                return Err(Error::processing_interrupted(format!(
                    "unit {} interrupted during decode",
                    unit.label()
                )));
            }
            result = adapter.decode_unit(&unit.source, &unit.month_key, workdir) => result?,
        };
        report.bulletin_count = decoded.bulletin_count;

        report.state = UnitState::Loading;
        let store_path = self.config.store_path(&unit.source.code);
        let mut store = TafStore::open(&store_path)?;
        let stats = store.load_batch(normalizer, &decoded.accepted_path, &decoded.decoded_path)?;
        report.complete(stats);

        if self.config.processing.clean_inputs {
            if let Err(e) = std::fs::remove_file(workdir.bulletin_file()) {
                warn!(
                    "Failed to remove decoder input for {}: {}",
                    unit.label(),
                    e
                );
            }
        }
        Ok(())
    }

    /// Phase 2: drive statistics for every pair x station x month cell
    ///
    /// Pairs fan out on the worker pool; within a pair, cells run
    /// sequentially in station-then-month order.
    pub async fn run_verify_phase(
        &self,
        report: &mut RunReport,
        show_progress: bool,
    ) -> Result<()> {
        if self.pairs.is_empty() {
            debug!("No pairs configured, skipping statistics phase");
            return Ok(());
        }

        let months = self.config.window.months();
        let cell_count = self.pairs.len() * self.stations.station_count() * months.len();
        info!(
            "Running statistics driver over {} cells ({} pairs x {} stations x {} months)",
            cell_count,
            self.pairs.len(),
            self.stations.station_count(),
            months.len()
        );

        let driver = StatsDriver::new(&self.config.driver);
        let progress = if show_progress && cell_count > 0 {
            Some(create_phase_progress_bar(
                cell_count as u64,
                "Running statistics driver",
            ))
        } else {
            None
        };

        let pair_outcomes: Vec<Result<Vec<DriverReport>>> = stream::iter(
            self.pairs
                .iter()
                .map(|pair| self.verify_pair(pair, &driver, &months, progress.as_ref())),
        )
        .buffer_unordered(self.config.processing.parallel_units)
        .collect()
        .await;

        if let Some(pb) = progress {
            pb.finish_with_message("Statistics phase complete");
        }

        for outcome in pair_outcomes {
            report.driver_invocations.extend(outcome?);
        }
        report.driver_invocations.sort_by(|a, b| {
            (&a.pair_code, &a.icao, &a.month_key).cmp(&(&b.pair_code, &b.icao, &b.month_key))
        });

        info!(
            "Statistics phase finished: {} succeeded, {} failed",
            report.invocations_succeeded(),
            report.invocations_failed()
        );
        Ok(())
    }

    /// Run every cell of one pair, regenerating its driver config first
    async fn verify_pair(
        &self,
        pair: &SourcePair,
        driver: &StatsDriver,
        months: &[String],
        progress: Option<&ProgressBar>,
    ) -> Result<Vec<DriverReport>> {
        write_driver_config(&self.config, pair)?;

        let mut reports = Vec::new();
        for station in self.stations.iter() {
            for month_key in months {
                if self.cancellation.is_cancelled() {
                    debug!("Pair {} interrupted, {} cells run", pair.code(), reports.len());
                    return Ok(reports);
                }
                reports.push(self.run_driver_cell(pair, station, month_key, driver).await);
                if let Some(pb) = progress {
                    pb.inc(1);
                }
            }
        }
        Ok(reports)
    }

    async fn run_driver_cell(
        &self,
        pair: &SourcePair,
        station: &Station,
        month_key: &str,
        driver: &StatsDriver,
    ) -> DriverReport {
        let pair_code = pair.code();
        let diagnostics_dir = self.config.paths.artifact_dir.join(&pair_code);
        let mut cell = DriverReport {
            pair_code,
            icao: station.icao.clone(),
            month_key: month_key.to_string(),
            succeeded: false,
            error: None,
            diagnostics_dir,
        };

        let result = match DriverInvocation::resolve(&self.config, pair, station, month_key) {
            Ok(invocation) => tokio::select! {
                _ = self.cancellation.cancelled() => {
                    Err(Error::processing_interrupted(format!(
                        "driver invocation {} interrupted",
                        invocation.label()
                    )))
                }
                result = driver.run(&invocation) => result,
            },
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => cell.succeeded = true,
            Err(e) => {
                error!("Driver invocation {} failed: {}", cell.label(), e);
                cell.error = Some(e.to_string());
            }
        }
        cell
    }
}

/// Create a progress bar for one pipeline phase
fn create_phase_progress_bar(total: u64, operation: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    pb.set_message(operation.to_string());
    pb
}
