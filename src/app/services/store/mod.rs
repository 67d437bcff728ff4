//! Idempotent per-source SQLite store
//!
//! Each source owns one database file named after its code. Loading is
//! transactional with conflict-replace merge semantics, so re-running a
//! batch over an overlapping time range replaces rows instead of
//! duplicating them.

use std::path::Path;
use std::time::Duration;

use rusqlite::Connection;
use tracing::debug;

use crate::constants::SQLITE_BUSY_TIMEOUT_MS;
use crate::{Error, Result};

pub mod loader;
pub mod schema;

#[cfg(test)]
pub mod tests;

pub use loader::LoadStats;

/// Row counts for one source's canonical relations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreCounts {
    pub headers: i64,
    pub elements: i64,

    /// Distinct stations appearing in loaded headers
    pub stations: i64,
}

/// Connection to one source's store
pub struct TafStore {
    pub(crate) conn: Connection,
}

impl TafStore {
    /// Open the store at the given path, creating file and schema if missing
    ///
    /// WAL and a busy timeout let writers for the same source serialize
    /// on the database instead of failing outright.
    pub fn open(path: &Path) -> Result<Self> {
        debug!("Opening store at {}", path.display());
        let conn = Connection::open(path)
            .map_err(|e| Error::store(format!("Failed to open store at {}", path.display()), e))?;
        Self::initialize(conn)
    }

    /// Open a private in-memory store
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::store("Failed to open in-memory store", e))?;
        Self::initialize(conn)
    }

    fn initialize(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;")
            .map_err(|e| Error::store("Failed to apply store pragmas", e))?;
        conn.busy_timeout(Duration::from_millis(SQLITE_BUSY_TIMEOUT_MS))
            .map_err(|e| Error::store("Failed to set store busy timeout", e))?;
        schema::create_tables(&conn)?;
        Ok(Self { conn })
    }

    /// Row counts for the canonical relations
    pub fn counts(&self) -> Result<StoreCounts> {
        Ok(StoreCounts {
            headers: self.count_rows(crate::constants::HEADER_TABLE)?,
            elements: self.count_rows(crate::constants::ELEMENT_TABLE)?,
            stations: self.distinct_stations()?,
        })
    }

    fn count_rows(&self, table: &str) -> Result<i64> {
        self.conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                row.get(0)
            })
            .map_err(|e| Error::store(format!("Failed to count rows in {table}"), e))
    }

    fn distinct_stations(&self) -> Result<i64> {
        self.conn
            .query_row(
                &format!(
                    "SELECT COUNT(DISTINCT station_id) FROM {}",
                    crate::constants::HEADER_TABLE
                ),
                [],
                |row| row.get(0),
            )
            .map_err(|e| Error::store("Failed to count distinct stations", e))
    }

    /// Drop and recreate every relation, discarding all loaded data
    pub fn reset(&self) -> Result<()> {
        schema::drop_tables(&self.conn)?;
        schema::create_tables(&self.conn)
    }
}
