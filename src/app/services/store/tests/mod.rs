//! Shared test utilities and fixtures for store tests

use tempfile::TempDir;

use crate::Result;
use crate::app::services::normalizer::Normalizer;
use crate::app::services::normalizer::tests::write_decoder_file;
use crate::app::services::store::{LoadStats, TafStore};
use crate::config::DatePolicy;


/// Open a fresh in-memory store
pub fn new_store() -> TafStore {
    TafStore::in_memory().unwrap()
}

/// Normalizer with the production-default lenient date policy
pub fn lenient_normalizer() -> Normalizer {
    Normalizer::new(DatePolicy::Lenient)
}

/// One raw header row for the given station and TAF text
pub fn header_row(station: &str, taf: &str) -> String {
    format!("05-Aug-23  ,1130,EGRR,MANL,05-Aug-23  ,1200,06-Aug-23  ,1800,{station},ORG,{taf}")
}

/// One raw element row for the given station, parameter and value
pub fn element_row(station: &str, parameter: &str, value: &str) -> String {
    format!(
        "05-Aug-23  ,1130,EGRR,MANL,05-Aug-23  ,1200,06-Aug-23  \
         ,1800,{station},ORG,INIT,{parameter},{value},"
    )
}

/// Write both decoder files to a temp dir and load them as one batch
pub fn load_rows(
    store: &mut TafStore,
    normalizer: &Normalizer,
    header_rows: &[&str],
    element_rows: &[&str],
) -> Result<LoadStats> {
    let dir = TempDir::new().unwrap();
    let accepted = write_decoder_file(&dir, "acceptedTafs.csv", header_rows);
    let decoded = write_decoder_file(&dir, "decodedTafs.csv", element_rows);
    store.load_batch(normalizer, &accepted, &decoded)
}

/// Count rows in any store table
pub fn table_count(store: &TafStore, table: &str) -> i64 {
    store
        .conn
        .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
            row.get(0)
        })
        .unwrap()
}

/// Fetch one column from the single row matching a station
pub fn single_value(store: &TafStore, table: &str, column: &str, station: &str) -> String {
    store
        .conn
        .query_row(
            &format!("SELECT {column} FROM {table} WHERE station_id = ?1"),
            [station],
            |row| row.get(0),
        )
        .unwrap()
}
