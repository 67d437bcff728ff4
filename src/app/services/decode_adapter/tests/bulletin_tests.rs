//! Tests for bulletin glob collection and decoder input assembly

use tempfile::TempDir;

use crate::Error;
use crate::app::services::decode_adapter::bulletins::{collect_bulletins, write_bulletin_input};
use crate::app::services::decode_adapter::tests::{source_with_glob, unit_for, write_bulletin};

#[test]
fn test_collect_finds_month_files_sorted() {
    let dir = TempDir::new().unwrap();
    let source = source_with_glob(&dir);
    write_bulletin(&dir, "202308", "b_late.txt", "TAF B");
    write_bulletin(&dir, "202308", "a_early.txt", "TAF A");

    let files = collect_bulletins(&source, "202308").unwrap();

    assert_eq!(files.len(), 2);
    assert!(files[0].ends_with("a_early.txt"));
    assert!(files[1].ends_with("b_late.txt"));
}

#[test]
fn test_collect_is_scoped_to_the_month() {
    let dir = TempDir::new().unwrap();
    let source = source_with_glob(&dir);
    write_bulletin(&dir, "202308", "aug.txt", "TAF AUG");
    write_bulletin(&dir, "202309", "sep.txt", "TAF SEP");

    let files = collect_bulletins(&source, "202309").unwrap();

    assert_eq!(files.len(), 1);
    assert!(files[0].ends_with("sep.txt"));
}

#[test]
fn test_collect_skips_directories() {
    let dir = TempDir::new().unwrap();
    let source = source_with_glob(&dir);
    write_bulletin(&dir, "202308", "real.txt", "TAF");
    std::fs::create_dir_all(dir.path().join("bulletins/202308/fake.txt")).unwrap();

    let files = collect_bulletins(&source, "202308").unwrap();

    assert_eq!(files.len(), 1);
    assert!(files[0].ends_with("real.txt"));
}

#[test]
fn test_collect_returns_empty_for_missing_month() {
    let dir = TempDir::new().unwrap();
    let source = source_with_glob(&dir);

    let files = collect_bulletins(&source, "202401").unwrap();

    assert!(files.is_empty());
}

#[test]
fn test_collect_rejects_invalid_pattern() {
    let dir = TempDir::new().unwrap();
    let source = crate::app::models::SourceType::new(
        "o2",
        "Open Road v2",
        format!("{}/[/{{month}}*.txt", dir.path().display()),
    )
    .unwrap();

    let result = collect_bulletins(&source, "202308");

    assert!(matches!(result, Err(Error::GlobPattern { .. })));
}

#[test]
fn test_input_concatenates_in_order() {
    let dir = TempDir::new().unwrap();
    let source = source_with_glob(&dir);
    write_bulletin(&dir, "202308", "a.txt", "TAF EGLL 051130Z\n");
    write_bulletin(&dir, "202308", "b.txt", "TAF EGKK 051130Z\n");
    let unit = unit_for(&dir, &source, "202308");
    unit.prepare().unwrap();

    let bulletins = collect_bulletins(&source, "202308").unwrap();
    let bytes = write_bulletin_input(&unit, &bulletins).unwrap();

    let written = std::fs::read_to_string(unit.bulletin_file()).unwrap();
    assert_eq!(written, "TAF EGLL 051130Z\nTAF EGKK 051130Z\n");
    assert_eq!(bytes, written.len() as u64);
}

#[test]
fn test_input_separates_files_missing_trailing_newline() {
    let dir = TempDir::new().unwrap();
    let source = source_with_glob(&dir);
    write_bulletin(&dir, "202308", "a.txt", "TAF EGLL 051130Z");
    write_bulletin(&dir, "202308", "b.txt", "TAF EGKK 051130Z");
    let unit = unit_for(&dir, &source, "202308");
    unit.prepare().unwrap();

    let bulletins = collect_bulletins(&source, "202308").unwrap();
    write_bulletin_input(&unit, &bulletins).unwrap();

    let written = std::fs::read_to_string(unit.bulletin_file()).unwrap();
    assert_eq!(written, "TAF EGLL 051130Z\nTAF EGKK 051130Z\n");
}

#[test]
fn test_input_for_no_bulletins_is_empty() {
    let dir = TempDir::new().unwrap();
    let source = source_with_glob(&dir);
    let unit = unit_for(&dir, &source, "202308");
    unit.prepare().unwrap();

    let bytes = write_bulletin_input(&unit, &[]).unwrap();

    assert_eq!(bytes, 0);
    assert_eq!(std::fs::read(unit.bulletin_file()).unwrap(), b"");
}
