//! Normalizer service turning decoder CSV output into canonical records
//!
//! The decoder writes two headerless CSV files per batch: one row per
//! accepted forecast header and one row per decoded change-group element.
//! This service reads both files and parses rows into typed records,
//! canonicalising date tokens, trimming text fields and casting numerics.
//! A cast failure aborts the batch; unparseable date tokens follow the
//! configured date policy instead.

use std::path::Path;

use csv::StringRecord;
use tracing::debug;

use crate::app::models::{TafElement, TafHeader};
use crate::config::DatePolicy;
use crate::constants::{ELEMENT_FIELD_COUNT, HEADER_FIELD_COUNT};
use crate::{Error, Result};

pub mod field_parsers;
pub mod record_parser;

#[cfg(test)]
pub mod tests;

pub use record_parser::{parse_element_record, parse_header_record};

/// Normalizer for decoder CSV output
///
/// Carries only the run's date-parsing policy; all other state is
/// per-call.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    date_policy: DatePolicy,
}

impl Normalizer {
    /// Create a normalizer with the given date-parsing policy
    pub fn new(date_policy: DatePolicy) -> Self {
        Self { date_policy }
    }

    /// Read raw rows from the accepted-forecast header CSV
    pub fn read_header_records(&self, path: &Path) -> Result<Vec<StringRecord>> {
        self.read_records(path, HEADER_FIELD_COUNT)
    }

    /// Read raw rows from the decoded-element CSV
    pub fn read_element_records(&self, path: &Path) -> Result<Vec<StringRecord>> {
        self.read_records(path, ELEMENT_FIELD_COUNT)
    }

    /// Parse one raw header row into a typed record
    pub fn parse_header(&self, record: &StringRecord) -> Result<TafHeader> {
        record_parser::parse_header_record(record, self.date_policy)
    }

    /// Parse one raw element row into a typed record
    pub fn parse_element(&self, record: &StringRecord) -> Result<TafElement> {
        record_parser::parse_element_record(record, self.date_policy)
    }

    /// Parse the accepted-forecast header CSV in full
    pub fn parse_header_file(&self, path: &Path) -> Result<Vec<TafHeader>> {
        self.read_header_records(path)?
            .iter()
            .map(|record| self.parse_header(record))
            .collect()
    }

    /// Parse the decoded-element CSV in full
    pub fn parse_element_file(&self, path: &Path) -> Result<Vec<TafElement>> {
        self.read_element_records(path)?
            .iter()
            .map(|record| self.parse_element(record))
            .collect()
    }

    /// Read all records from a headerless decoder CSV
    ///
    /// Element rows end with a trailing comma, so the reader must accept
    /// ragged field counts; rows below the expected width are rejected.
    fn read_records(&self, path: &Path, expected_fields: usize) -> Result<Vec<StringRecord>> {
        debug!("Reading decoder output: {}", path.display());

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .map_err(|e| {
                Error::csv_parsing(
                    path.display().to_string(),
                    "Failed to open decoder output",
                    Some(e),
                )
            })?;

        let mut records = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                Error::csv_parsing(
                    path.display().to_string(),
                    format!("Failed to read row {}", index + 1),
                    Some(e),
                )
            })?;

            if record.len() < expected_fields {
                return Err(Error::csv_parsing(
                    path.display().to_string(),
                    format!(
                        "Row {} has {} fields, expected at least {}",
                        index + 1,
                        record.len(),
                        expected_fields
                    ),
                    None,
                ));
            }

            records.push(record);
        }

        Ok(records)
    }
}
