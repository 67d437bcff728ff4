//! Batch units and their lifecycle

use std::fmt;
use std::path::PathBuf;

use crate::app::models::SourceType;
use crate::app::services::store::LoadStats;

/// Lifecycle of one batch unit
///
/// Every unit moves `Pending -> Decoding -> Loading -> Done`, or stops
/// at `Failed`. A unit still `Pending` in a finished report was never
/// started (the run was cancelled first).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitState {
    Pending,
    Decoding,
    Loading,
    Done,
    Failed,
}

impl UnitState {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitState::Pending => "PENDING",
            UnitState::Decoding => "DECODING",
            UnitState::Loading => "LOADING",
            UnitState::Done => "DONE",
            UnitState::Failed => "FAILED",
        }
    }
}

impl fmt::Display for UnitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One (source, month) unit of batch work
#[derive(Debug, Clone)]
pub struct BatchUnit {
    pub source: SourceType,
    pub month_key: String,
}

impl BatchUnit {
    pub fn new(source: SourceType, month_key: impl Into<String>) -> Self {
        Self {
            source,
            month_key: month_key.into(),
        }
    }

    /// Short label for logs and reports, e.g. "o2/202308"
    pub fn label(&self) -> String {
        format!("{}/{}", self.source.code, self.month_key)
    }
}

/// Final outcome of one unit
#[derive(Debug, Clone)]
pub struct UnitReport {
    pub source_code: String,
    pub month_key: String,
    pub state: UnitState,

    /// Bulletin files fed to the decoder
    pub bulletin_count: usize,

    /// Rows merged when the unit completed
    pub headers_loaded: usize,
    pub elements_loaded: usize,

    /// Failure message for a `Failed` unit
    pub error: Option<String>,

    /// Unit work directory holding captured decoder diagnostics
    pub diagnostics_dir: PathBuf,
}

impl UnitReport {
    pub fn new(unit: &BatchUnit, diagnostics_dir: PathBuf) -> Self {
        Self {
            source_code: unit.source.code.to_string(),
            month_key: unit.month_key.clone(),
            state: UnitState::Pending,
            bulletin_count: 0,
            headers_loaded: 0,
            elements_loaded: 0,
            error: None,
            diagnostics_dir,
        }
    }

    /// Short label, e.g. "o2/202308"
    pub fn label(&self) -> String {
        format!("{}/{}", self.source_code, self.month_key)
    }

    /// Mark the unit done with its merged row counts
    pub fn complete(&mut self, stats: LoadStats) {
        self.state = UnitState::Done;
        self.headers_loaded = stats.headers_loaded;
        self.elements_loaded = stats.elements_loaded;
    }

    /// Mark the unit failed, keeping the failure message
    pub fn fail(&mut self, message: impl Into<String>) {
        self.state = UnitState::Failed;
        self.error = Some(message.into());
    }
}
