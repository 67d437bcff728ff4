//! Tests for file-level normalization

use tempfile::TempDir;

use super::{SAMPLE_ELEMENT_ROW, SAMPLE_HEADER_ROW, write_decoder_file};
use crate::Error;
use crate::app::services::normalizer::Normalizer;
use crate::config::DatePolicy;

#[test]
fn test_parse_header_file() {
    let temp_dir = TempDir::new().unwrap();
    let second = SAMPLE_HEADER_ROW.replace(",1130,", ",1730,");
    let path = write_decoder_file(
        &temp_dir,
        "acceptedTafs.csv",
        &[SAMPLE_HEADER_ROW, &second],
    );

    let normalizer = Normalizer::new(DatePolicy::Lenient);
    let headers = normalizer.parse_header_file(&path).unwrap();

    assert_eq!(headers.len(), 2);
    assert_eq!(headers[0].identity.issue_time, 1130);
    assert_eq!(headers[1].identity.issue_time, 1730);
}

#[test]
fn test_parse_element_file_with_trailing_commas() {
    let temp_dir = TempDir::new().unwrap();
    let becmg = SAMPLE_ELEMENT_ROW.replace("INIT", "BECMG");
    let path = write_decoder_file(
        &temp_dir,
        "decodedTafs.csv",
        &[SAMPLE_ELEMENT_ROW, &becmg],
    );

    let normalizer = Normalizer::new(DatePolicy::Lenient);
    let elements = normalizer.parse_element_file(&path).unwrap();

    assert_eq!(elements.len(), 2);
    assert_eq!(elements[0].value, 9999.0);
}

#[test]
fn test_read_records_preserves_raw_fields() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_decoder_file(&temp_dir, "acceptedTafs.csv", &[SAMPLE_HEADER_ROW]);

    let normalizer = Normalizer::new(DatePolicy::Lenient);
    let records = normalizer.read_header_records(&path).unwrap();

    assert_eq!(records.len(), 1);
    // Raw date tokens keep their padding until parsed
    assert_eq!(records[0].get(0), Some("05-Aug-23  "));
    assert_eq!(records[0].get(9), Some("ORG"));
}

#[test]
fn test_empty_files_yield_no_records() {
    let temp_dir = TempDir::new().unwrap();
    let accepted = write_decoder_file(&temp_dir, "acceptedTafs.csv", &[]);
    let decoded = write_decoder_file(&temp_dir, "decodedTafs.csv", &[]);

    let normalizer = Normalizer::new(DatePolicy::Lenient);
    assert!(normalizer.parse_header_file(&accepted).unwrap().is_empty());
    assert!(normalizer.parse_element_file(&decoded).unwrap().is_empty());
}

#[test]
fn test_truncated_row_fails() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_decoder_file(
        &temp_dir,
        "acceptedTafs.csv",
        &["05-Aug-23  ,1130,EGRR,MANL"],
    );

    let normalizer = Normalizer::new(DatePolicy::Lenient);
    let result = normalizer.parse_header_file(&path);

    assert!(matches!(result, Err(Error::CsvParsing { .. })));
}

#[test]
fn test_missing_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("no_such_file.csv");

    let normalizer = Normalizer::new(DatePolicy::Lenient);
    assert!(normalizer.parse_header_file(&path).is_err());
}

#[test]
fn test_malformed_row_aborts_whole_file() {
    let temp_dir = TempDir::new().unwrap();
    let bad = SAMPLE_ELEMENT_ROW.replace(",9999,", ",oops,");
    let path = write_decoder_file(&temp_dir, "decodedTafs.csv", &[SAMPLE_ELEMENT_ROW, &bad]);

    let normalizer = Normalizer::new(DatePolicy::Lenient);
    let result = normalizer.parse_element_file(&path);

    assert!(matches!(result, Err(Error::MalformedValue { .. })));
}
