//! Shared test utilities and fixtures for decode adapter tests

use std::path::PathBuf;

use tempfile::TempDir;

use crate::app::models::SourceType;
use crate::app::services::decode_adapter::UnitWorkDir;
use crate::config::ExternalToolConfig;

pub mod bulletin_tests;

/// A source whose bulletin glob points into the given temp dir
pub fn source_with_glob(dir: &TempDir) -> SourceType {
    SourceType::new(
        "o2",
        "Open Road v2",
        format!("{}/bulletins/{{month}}/*.txt", dir.path().display()),
    )
    .unwrap()
}

/// Write one raw bulletin file under the temp dir's month directory
pub fn write_bulletin(dir: &TempDir, month_key: &str, name: &str, content: &str) -> PathBuf {
    let month_dir = dir.path().join("bulletins").join(month_key);
    std::fs::create_dir_all(&month_dir).unwrap();
    let path = month_dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

/// Unit work dir rooted under the temp dir
pub fn unit_for(dir: &TempDir, source: &SourceType, month_key: &str) -> UnitWorkDir {
    UnitWorkDir::new(&dir.path().join("work"), &source.code, month_key)
}

/// Decoder stub: a shell script run as `sh script.sh -i IN -o OUT`
///
/// The script body sees the input and output directories as $IN and
/// $OUT.
pub fn stub_decoder(dir: &TempDir, body: &str) -> ExternalToolConfig {
    let script = dir.path().join("decoder.sh");
    std::fs::write(&script, format!("#!/bin/sh\nIN=\"$2\"\nOUT=\"$4\"\n{body}\n")).unwrap();
    ExternalToolConfig {
        command: PathBuf::from("sh"),
        args: vec![script.display().to_string()],
    }
}

/// Stub body that writes well-formed, empty-but-present decoder outputs
pub const WRITE_ALL_OUTPUTS: &str = "touch \"$OUT/acceptedTafs.csv\" \
     \"$OUT/decodedTafs.csv\" \"$OUT/rejectedTafs.txt\"";
