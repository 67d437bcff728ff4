//! Shared test utilities and fixtures for orchestrator tests

use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use crate::app::services::decode_adapter::tests::stub_decoder;
use crate::app::services::orchestrator::Orchestrator;
use crate::app::services::stats_driver::tests::date_time;
use crate::config::{Config, ExternalToolConfig, SourceEntry, StationEntry, WindowConfig};

pub mod unit_tests;

/// Decoder stub body emitting one header and one element row per unit
pub const DECODE_ONE_FORECAST: &str = r#"printf '05-Aug-23  ,1130,EGRR,MANL,05-Aug-23  ,1200,06-Aug-23  ,1800,EGLL,ORG,TAF EGLL 051130Z\n' > "$OUT/acceptedTafs.csv"
printf '05-Aug-23  ,1130,EGRR,MANL,05-Aug-23  ,1200,06-Aug-23  ,1800,EGLL,ORG,INIT,VIS,9999,\n' > "$OUT/decodedTafs.csv""#;

/// Two-source, one-station, one-pair configuration rooted in the temp dir
///
/// The window covers August 2023 only; bulletins are expected under
/// `<dir>/bulletins/<code>/<month>/`.
pub fn pipeline_config(dir: &TempDir) -> Config {
    let root = dir.path().display();
    let mut config = Config::default();
    config.window = WindowConfig {
        start: date_time(2023, 8, 1, 0, 0),
        end: date_time(2023, 9, 1, 0, 0),
    };
    config.sources = vec![
        SourceEntry {
            code: "o2".to_string(),
            label: "Open Road v2".to_string(),
            bulletin_glob: format!("{root}/bulletins/o2/{{month}}/*.txt"),
        },
        SourceEntry {
            code: "x2".to_string(),
            label: "Crossway v2".to_string(),
            bulletin_glob: format!("{root}/bulletins/x2/{{month}}/*.txt"),
        },
    ];
    config.stations = vec![StationEntry {
        icao: "EGLL".to_string(),
        name: "Heathrow".to_string(),
        horizon_hours: 24,
    }];
    config.verification.pairs = vec!["o2x2".to_string()];
    config.decoder = stub_decoder(dir, DECODE_ONE_FORECAST);
    config.driver = ExternalToolConfig {
        command: PathBuf::from("true"),
        args: Vec::new(),
    };
    config.paths.work_dir = dir.path().join("work");
    config.paths.store_dir = dir.path().join("stores");
    config.paths.artifact_dir = dir.path().join("artifacts");
    config.processing.parallel_units = 2;
    config.ensure_directories().unwrap();
    config
}

/// Write one raw bulletin for a source's month
pub fn write_source_bulletin(dir: &TempDir, code: &str, month_key: &str, name: &str, content: &str) {
    let bulletin_dir = dir.path().join("bulletins").join(code).join(month_key);
    std::fs::create_dir_all(&bulletin_dir).unwrap();
    std::fs::write(bulletin_dir.join(name), content).unwrap();
}

/// Orchestrator over the given configuration with a fresh token
pub fn orchestrator_for(config: Config) -> Orchestrator {
    Orchestrator::new(Arc::new(config), CancellationToken::new()).unwrap()
}
