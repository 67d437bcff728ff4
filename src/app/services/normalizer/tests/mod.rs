//! Shared test utilities and fixtures for normalizer tests

use std::path::PathBuf;

use csv::StringRecord;
use tempfile::TempDir;

pub mod normalizer_tests;

/// A header row as the decoder writes it
pub const SAMPLE_HEADER_ROW: &str = "05-Aug-23  ,1130,EGRR,MANL,05-Aug-23  ,1200,06-Aug-23  \
                                     ,1800,EGLL,ORG,TAF EGLL 051130Z 0512/0618 24010KT 9999 SCT030";

/// An element row as the decoder writes it, with its trailing comma
pub const SAMPLE_ELEMENT_ROW: &str =
    "05-Aug-23  ,1130,EGRR,MANL,05-Aug-23  ,1200,06-Aug-23  ,1800,EGLL,ORG,INIT,VIS,9999,";

/// Build a StringRecord from one raw CSV line
pub fn record_from_line(line: &str) -> StringRecord {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());
    reader.records().next().unwrap().unwrap()
}

/// Write decoder-style CSV rows to a file under a temp dir
pub fn write_decoder_file(dir: &TempDir, filename: &str, rows: &[&str]) -> PathBuf {
    let path = dir.path().join(filename);
    let mut content = rows.join("\n");
    content.push('\n');
    std::fs::write(&path, content).unwrap();
    path
}
