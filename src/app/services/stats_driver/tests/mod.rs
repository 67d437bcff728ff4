//! Shared test utilities and fixtures for statistics driver tests

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};
use tempfile::TempDir;

use crate::app::models::{SourceCode, SourcePair, Station};
use crate::config::{Config, ExternalToolConfig, WindowConfig};


pub fn date_time(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

/// Run configuration rooted in the temp dir, window covering Aug-Sep 2023
pub fn config_for(dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.paths.work_dir = dir.path().join("work");
    config.paths.store_dir = dir.path().join("stores");
    config.paths.artifact_dir = dir.path().join("artifacts");
    config.window = WindowConfig {
        start: date_time(2023, 8, 1, 0, 0),
        end: date_time(2023, 10, 1, 0, 0),
    };
    std::fs::create_dir_all(&config.paths.artifact_dir).unwrap();
    config
}

pub fn pair_o2x2() -> SourcePair {
    SourcePair::new(
        SourceCode::new("o2").unwrap(),
        SourceCode::new("x2").unwrap(),
    )
}

pub fn heathrow() -> Station {
    Station::new("EGLL", "Heathrow", 24).unwrap()
}

/// Driver stub that records its arguments, one per line
pub fn recording_driver(dir: &TempDir) -> (ExternalToolConfig, PathBuf) {
    let args_file = dir.path().join("driver_args.txt");
    let script = dir.path().join("driver.sh");
    std::fs::write(
        &script,
        format!(
            "#!/bin/sh\nfor a in \"$@\"; do echo \"$a\"; done > \"{}\"\n",
            args_file.display()
        ),
    )
    .unwrap();
    let tool = ExternalToolConfig {
        command: PathBuf::from("sh"),
        args: vec![script.display().to_string()],
    };
    (tool, args_file)
}

/// Driver stub that fails with a diagnostic on stderr
pub fn failing_driver(dir: &TempDir) -> ExternalToolConfig {
    let script = dir.path().join("driver.sh");
    std::fs::write(&script, "#!/bin/sh\necho 'no reference data found' >&2\nexit 2\n").unwrap();
    ExternalToolConfig {
        command: PathBuf::from("sh"),
        args: vec![script.display().to_string()],
    }
}
