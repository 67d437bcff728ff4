//! SQLite schema for the per-source forecast store
//!
//! Two canonical relations keyed by composite natural keys, plus two
//! loose-typed staging relations mirroring the decoder CSV shape. The
//! staging rows are truncated at the start of each batch and survive
//! until the next one; canonical rows persist until a reset drops the
//! whole store.

use rusqlite::Connection;

use crate::{Error, Result};

/// Canonical and staging relations for one source
///
/// Dates are ISO-formatted TEXT (the invalid-date sentinel is the empty
/// string, which still participates in the key), times are plain HHMM
/// integers. The ten identifying columns form the header key; elements
/// add the change type and parameter.
const CREATE_TABLES: &str = "
CREATE TABLE IF NOT EXISTS taf_data (
    issue_date    TEXT NOT NULL,
    issue_time    INTEGER NOT NULL,
    issue_station TEXT NOT NULL,
    issue_origin  TEXT NOT NULL,
    start_date    TEXT NOT NULL,
    start_time    INTEGER NOT NULL,
    end_date      TEXT NOT NULL,
    end_time      INTEGER NOT NULL,
    station_id    TEXT NOT NULL,
    status        TEXT NOT NULL,
    taf           TEXT NOT NULL,
    PRIMARY KEY (issue_date, issue_time, issue_station, issue_origin,
                 start_date, start_time, end_date, end_time,
                 station_id, status)
);

CREATE INDEX IF NOT EXISTS idx_taf_data_station
    ON taf_data (station_id, start_date);

CREATE TABLE IF NOT EXISTS taf_decoded_data (
    issue_date    TEXT NOT NULL,
    issue_time    INTEGER NOT NULL,
    issue_station TEXT NOT NULL,
    issue_origin  TEXT NOT NULL,
    start_date    TEXT NOT NULL,
    start_time    INTEGER NOT NULL,
    end_date      TEXT NOT NULL,
    end_time      INTEGER NOT NULL,
    station_id    TEXT NOT NULL,
    status        TEXT NOT NULL,
    change_type   TEXT NOT NULL,
    parameter     TEXT NOT NULL,
    value         REAL NOT NULL,
    PRIMARY KEY (issue_date, issue_time, issue_station, issue_origin,
                 start_date, start_time, end_date, end_time,
                 station_id, status, change_type, parameter)
);

CREATE INDEX IF NOT EXISTS idx_taf_decoded_data_station
    ON taf_decoded_data (station_id, start_date);

CREATE TABLE IF NOT EXISTS taf_data_stage (
    issue_date    TEXT,
    issue_time    TEXT,
    issue_station TEXT,
    issue_origin  TEXT,
    start_date    TEXT,
    start_time    TEXT,
    end_date      TEXT,
    end_time      TEXT,
    station_id    TEXT,
    status        TEXT,
    taf           TEXT
);

CREATE TABLE IF NOT EXISTS taf_decoded_data_stage (
    issue_date    TEXT,
    issue_time    TEXT,
    issue_station TEXT,
    issue_origin  TEXT,
    start_date    TEXT,
    start_time    TEXT,
    end_date      TEXT,
    end_time      TEXT,
    station_id    TEXT,
    status        TEXT,
    change_type   TEXT,
    parameter     TEXT,
    value         TEXT
);
";

const DROP_TABLES: &str = "
DROP TABLE IF EXISTS taf_data;
DROP TABLE IF EXISTS taf_decoded_data;
DROP TABLE IF EXISTS taf_data_stage;
DROP TABLE IF EXISTS taf_decoded_data_stage;
";

/// Create all relations if they do not exist
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_TABLES)
        .map_err(|e| Error::store("Failed to create store schema", e))
}

/// Drop every relation, discarding all loaded data
pub fn drop_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(DROP_TABLES)
        .map_err(|e| Error::store("Failed to drop store schema", e))
}
