//! Run reports aggregating unit and driver outcomes

use std::path::PathBuf;

use super::unit::{UnitReport, UnitState};

/// Outcome of one statistics driver invocation
#[derive(Debug, Clone)]
pub struct DriverReport {
    pub pair_code: String,
    pub icao: String,
    pub month_key: String,
    pub succeeded: bool,

    /// Failure message for a failed invocation
    pub error: Option<String>,

    /// Pair artifact directory holding captured driver logs
    pub diagnostics_dir: PathBuf,
}

impl DriverReport {
    /// Short label, e.g. "o2x2/EGLL/202308"
    pub fn label(&self) -> String {
        format!("{}/{}/{}", self.pair_code, self.icao, self.month_key)
    }
}

/// Complete outcome of one run
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub units: Vec<UnitReport>,
    pub driver_invocations: Vec<DriverReport>,
}

impl RunReport {
    pub fn units_done(&self) -> usize {
        self.count_units(UnitState::Done)
    }

    pub fn units_failed(&self) -> usize {
        self.count_units(UnitState::Failed)
    }

    /// Units never started before the run was cancelled
    pub fn units_skipped(&self) -> usize {
        self.count_units(UnitState::Pending)
    }

    fn count_units(&self, state: UnitState) -> usize {
        self.units.iter().filter(|u| u.state == state).count()
    }

    pub fn total_headers_loaded(&self) -> usize {
        self.units.iter().map(|u| u.headers_loaded).sum()
    }

    pub fn total_elements_loaded(&self) -> usize {
        self.units.iter().map(|u| u.elements_loaded).sum()
    }

    pub fn invocations_succeeded(&self) -> usize {
        self.driver_invocations.iter().filter(|d| d.succeeded).count()
    }

    pub fn invocations_failed(&self) -> usize {
        self.driver_invocations.iter().filter(|d| !d.succeeded).count()
    }

    /// Whether every unit and every driver invocation succeeded
    pub fn is_clean(&self) -> bool {
        self.units_failed() == 0
            && self.units_skipped() == 0
            && self.invocations_failed() == 0
    }

    /// One-line summary across both phases
    pub fn summary(&self) -> String {
        format!(
            "Units: {} done, {} failed, {} skipped | Rows: {} headers, {} elements | \
             Driver: {} succeeded, {} failed",
            self.units_done(),
            self.units_failed(),
            self.units_skipped(),
            self.total_headers_loaded(),
            self.total_elements_loaded(),
            self.invocations_succeeded(),
            self.invocations_failed(),
        )
    }
}
