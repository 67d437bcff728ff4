//! Stage-and-merge loading of decoder batches
//!
//! One batch loads inside a single transaction: the staging relations
//! are truncated and refilled with the raw CSV rows, and each row's
//! typed form is merged into its canonical relation with
//! `INSERT OR REPLACE`, so a colliding natural key replaces the
//! existing row in full. Any failure rolls the whole batch back,
//! leaving the store exactly as it was before the unit started.

use std::path::Path;

use csv::StringRecord;
use rusqlite::{Transaction, TransactionBehavior, params};
use tracing::info;

use super::TafStore;
use crate::app::models::{TafElement, TafHeader};
use crate::app::services::normalizer::Normalizer;
use crate::{Error, Result};

/// Row counts from one committed batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Header rows merged into the canonical relation
    pub headers_loaded: usize,

    /// Element rows merged into the canonical relation
    pub elements_loaded: usize,
}

impl TafStore {
    /// Load one decoder output pair, replacing rows with colliding keys
    pub fn load_batch(
        &mut self,
        normalizer: &Normalizer,
        accepted_path: &Path,
        decoded_path: &Path,
    ) -> Result<LoadStats> {
        let header_rows = normalizer.read_header_records(accepted_path)?;
        let element_rows = normalizer.read_element_records(decoded_path)?;

        // Immediate: concurrent units for the same source queue at BEGIN
        // under the busy timeout rather than failing at commit.
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| Error::store("Failed to begin load transaction", e))?;

        tx.execute("DELETE FROM taf_data_stage", [])
            .map_err(|e| Error::store("Failed to truncate header stage", e))?;
        tx.execute("DELETE FROM taf_decoded_data_stage", [])
            .map_err(|e| Error::store("Failed to truncate element stage", e))?;

        for row in &header_rows {
            stage_header(&tx, row)?;
            merge_header(&tx, &normalizer.parse_header(row)?)?;
        }
        for row in &element_rows {
            stage_element(&tx, row)?;
            merge_element(&tx, &normalizer.parse_element(row)?)?;
        }

        tx.commit()
            .map_err(|e| Error::store("Failed to commit load transaction", e))?;

        let stats = LoadStats {
            headers_loaded: header_rows.len(),
            elements_loaded: element_rows.len(),
        };
        info!(
            "Loaded {} header and {} element rows",
            stats.headers_loaded, stats.elements_loaded
        );
        Ok(stats)
    }
}

/// Copy one raw header row into the staging relation
fn stage_header(tx: &Transaction<'_>, row: &StringRecord) -> Result<()> {
    let mut stmt = tx
        .prepare_cached(
            "INSERT INTO taf_data_stage (issue_date, issue_time, issue_station,
                issue_origin, start_date, start_time, end_date, end_time,
                station_id, status, taf)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        )
        .map_err(|e| Error::store("Failed to prepare header stage insert", e))?;

    stmt.execute(params![
        row.get(0),
        row.get(1),
        row.get(2),
        row.get(3),
        row.get(4),
        row.get(5),
        row.get(6),
        row.get(7),
        row.get(8),
        row.get(9),
        row.get(10),
    ])
    .map_err(|e| Error::store("Failed to stage header row", e))?;
    Ok(())
}

/// Copy one raw element row into the staging relation
fn stage_element(tx: &Transaction<'_>, row: &StringRecord) -> Result<()> {
    let mut stmt = tx
        .prepare_cached(
            "INSERT INTO taf_decoded_data_stage (issue_date, issue_time, issue_station,
                issue_origin, start_date, start_time, end_date, end_time,
                station_id, status, change_type, parameter, value)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        )
        .map_err(|e| Error::store("Failed to prepare element stage insert", e))?;

    stmt.execute(params![
        row.get(0),
        row.get(1),
        row.get(2),
        row.get(3),
        row.get(4),
        row.get(5),
        row.get(6),
        row.get(7),
        row.get(8),
        row.get(9),
        row.get(10),
        row.get(11),
        row.get(12),
    ])
    .map_err(|e| Error::store("Failed to stage element row", e))?;
    Ok(())
}

/// Merge one typed header record into the canonical relation
pub fn merge_header(tx: &Transaction<'_>, header: &TafHeader) -> Result<()> {
    let mut stmt = tx
        .prepare_cached(
            "INSERT OR REPLACE INTO taf_data (issue_date, issue_time, issue_station,
                issue_origin, start_date, start_time, end_date, end_time,
                station_id, status, taf)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        )
        .map_err(|e| Error::store("Failed to prepare header merge", e))?;

    let identity = &header.identity;
    stmt.execute(params![
        identity.issue_date.to_store_string(),
        identity.issue_time,
        identity.issue_station,
        identity.issue_origin,
        identity.start_date.to_store_string(),
        identity.start_time,
        identity.end_date.to_store_string(),
        identity.end_time,
        identity.station_id,
        identity.status.as_str(),
        header.taf,
    ])
    .map_err(|e| Error::store("Failed to merge header row", e))?;
    Ok(())
}

/// Merge one typed element record into the canonical relation
pub fn merge_element(tx: &Transaction<'_>, element: &TafElement) -> Result<()> {
    let mut stmt = tx
        .prepare_cached(
            "INSERT OR REPLACE INTO taf_decoded_data (issue_date, issue_time, issue_station,
                issue_origin, start_date, start_time, end_date, end_time,
                station_id, status, change_type, parameter, value)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        )
        .map_err(|e| Error::store("Failed to prepare element merge", e))?;

    let identity = &element.identity;
    stmt.execute(params![
        identity.issue_date.to_store_string(),
        identity.issue_time,
        identity.issue_station,
        identity.issue_origin,
        identity.start_date.to_store_string(),
        identity.start_time,
        identity.end_date.to_store_string(),
        identity.end_time,
        identity.station_id,
        identity.status.as_str(),
        element.change_type.as_str(),
        element.parameter.as_str(),
        element.value,
    ])
    .map_err(|e| Error::store("Failed to merge element row", e))?;
    Ok(())
}
