//! Tests for unit lifecycle states and run reports

use std::path::PathBuf;

use crate::app::models::SourceType;
use crate::app::services::orchestrator::report::{DriverReport, RunReport};
use crate::app::services::orchestrator::unit::{BatchUnit, UnitReport, UnitState};
use crate::app::services::store::LoadStats;

fn open_road() -> SourceType {
    SourceType::new("o2", "Open Road v2", "bulletins/{month}/*.txt").unwrap()
}

fn report_in_state(month_key: &str, state: UnitState) -> UnitReport {
    let unit = BatchUnit::new(open_road(), month_key);
    let mut report = UnitReport::new(&unit, PathBuf::from("work/o2").join(month_key));
    report.state = state;
    report
}

fn driver_cell(month_key: &str, succeeded: bool) -> DriverReport {
    DriverReport {
        pair_code: "o2x2".to_string(),
        icao: "EGLL".to_string(),
        month_key: month_key.to_string(),
        succeeded,
        error: (!succeeded).then(|| "driver exited with status 2".to_string()),
        diagnostics_dir: PathBuf::from("artifacts/o2x2"),
    }
}

#[test]
fn test_unit_state_names() {
    assert_eq!(UnitState::Pending.as_str(), "PENDING");
    assert_eq!(UnitState::Decoding.as_str(), "DECODING");
    assert_eq!(UnitState::Loading.as_str(), "LOADING");
    assert_eq!(UnitState::Done.as_str(), "DONE");
    assert_eq!(UnitState::Failed.as_str(), "FAILED");
    assert_eq!(format!("{}", UnitState::Done), "DONE");
}

#[test]
fn test_unit_label() {
    let unit = BatchUnit::new(open_road(), "202308");
    assert_eq!(unit.label(), "o2/202308");
}

#[test]
fn test_new_report_starts_pending() {
    let unit = BatchUnit::new(open_road(), "202308");
    let report = UnitReport::new(&unit, PathBuf::from("work/o2/202308"));

    assert_eq!(report.state, UnitState::Pending);
    assert_eq!(report.label(), "o2/202308");
    assert_eq!(report.bulletin_count, 0);
    assert_eq!(report.headers_loaded, 0);
    assert_eq!(report.elements_loaded, 0);
    assert!(report.error.is_none());
}

#[test]
fn test_complete_records_merged_counts() {
    let mut report = report_in_state("202308", UnitState::Loading);
    report.complete(LoadStats {
        headers_loaded: 3,
        elements_loaded: 12,
    });

    assert_eq!(report.state, UnitState::Done);
    assert_eq!(report.headers_loaded, 3);
    assert_eq!(report.elements_loaded, 12);
    assert!(report.error.is_none());
}

#[test]
fn test_fail_keeps_message() {
    let mut report = report_in_state("202308", UnitState::Decoding);
    report.fail("decoder exited with status 1");

    assert_eq!(report.state, UnitState::Failed);
    assert_eq!(report.error.as_deref(), Some("decoder exited with status 1"));
}

#[test]
fn test_run_report_counts_units_by_state() {
    let mut done = report_in_state("202308", UnitState::Loading);
    done.complete(LoadStats {
        headers_loaded: 2,
        elements_loaded: 8,
    });
    let mut also_done = report_in_state("202309", UnitState::Loading);
    also_done.complete(LoadStats {
        headers_loaded: 1,
        elements_loaded: 4,
    });
    let mut failed = report_in_state("202310", UnitState::Decoding);
    failed.fail("no bulletins");
    let pending = report_in_state("202311", UnitState::Pending);

    let report = RunReport {
        units: vec![done, also_done, failed, pending],
        driver_invocations: Vec::new(),
    };

    assert_eq!(report.units_done(), 2);
    assert_eq!(report.units_failed(), 1);
    assert_eq!(report.units_skipped(), 1);
    assert_eq!(report.total_headers_loaded(), 3);
    assert_eq!(report.total_elements_loaded(), 12);
}

#[test]
fn test_run_report_counts_driver_invocations() {
    let report = RunReport {
        units: Vec::new(),
        driver_invocations: vec![
            driver_cell("202308", true),
            driver_cell("202309", false),
            driver_cell("202310", true),
        ],
    };

    assert_eq!(report.invocations_succeeded(), 2);
    assert_eq!(report.invocations_failed(), 1);
}

#[test]
fn test_driver_report_label() {
    assert_eq!(driver_cell("202308", true).label(), "o2x2/EGLL/202308");
}

#[test]
fn test_is_clean_requires_every_outcome_good() {
    let mut done = report_in_state("202308", UnitState::Loading);
    done.complete(LoadStats {
        headers_loaded: 1,
        elements_loaded: 1,
    });
    let clean = RunReport {
        units: vec![done.clone()],
        driver_invocations: vec![driver_cell("202308", true)],
    };
    assert!(clean.is_clean());

    let failed_unit = RunReport {
        units: vec![done.clone(), {
            let mut failed = report_in_state("202309", UnitState::Decoding);
            failed.fail("boom");
            failed
        }],
        driver_invocations: Vec::new(),
    };
    assert!(!failed_unit.is_clean());

    let skipped_unit = RunReport {
        units: vec![done.clone(), report_in_state("202309", UnitState::Pending)],
        driver_invocations: Vec::new(),
    };
    assert!(!skipped_unit.is_clean());

    let failed_cell = RunReport {
        units: vec![done],
        driver_invocations: vec![driver_cell("202308", false)],
    };
    assert!(!failed_cell.is_clean());
}

#[test]
fn test_summary_line() {
    let mut done = report_in_state("202308", UnitState::Loading);
    done.complete(LoadStats {
        headers_loaded: 5,
        elements_loaded: 20,
    });
    let mut failed = report_in_state("202309", UnitState::Decoding);
    failed.fail("no bulletins");

    let report = RunReport {
        units: vec![done, failed],
        driver_invocations: vec![driver_cell("202308", true), driver_cell("202309", false)],
    };

    assert_eq!(
        report.summary(),
        "Units: 1 done, 1 failed, 0 skipped | Rows: 5 headers, 20 elements | \
         Driver: 1 succeeded, 1 failed"
    );
}
