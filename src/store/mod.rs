//! SurfsUp store layer: read-only SQLite access to the climate dataset.
//!
//! The dataset ships as a single database file (by default
//! `Resources/hawaii.sqlite`) with two tables, `measurement` and `station`.
//! Their layout is declared statically in [`MEASUREMENT_TABLE`] and
//! [`STATION_TABLE`] and checked once per connection by [`open_dataset`];
//! this service never creates or migrates tables.

pub mod error;
pub mod measurement;
pub mod station;

pub use error::StoreError;

use rusqlite::{Connection, OpenFlags};
use std::path::Path;

/// Static description of a table this service reads from.
#[derive(Debug, Clone, Copy)]
pub struct TableSchema {
    pub name: &'static str,
    pub columns: &'static [&'static str],
}

pub const MEASUREMENT_TABLE: TableSchema = TableSchema {
    name: "measurement",
    columns: &["station", "date", "prcp", "tobs"],
};

pub const STATION_TABLE: TableSchema = TableSchema {
    name: "station",
    columns: &["station", "name", "latitude", "longitude", "elevation"],
};

/// Open the dataset read-only and verify that both tables carry the expected columns.
///
/// The returned connection is meant to live for a single request and be
/// dropped afterwards.
pub fn open_dataset(db_path: &Path) -> Result<Connection, StoreError> {
    let conn = Connection::open_with_flags(
        db_path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(|e| StoreError::Open(db_path.to_path_buf(), e))?;

    verify_schema(&conn)?;
    Ok(conn)
}

/// Check every declared table and column against `PRAGMA table_info`.
pub fn verify_schema(conn: &Connection) -> Result<(), StoreError> {
    for table in [MEASUREMENT_TABLE, STATION_TABLE] {
        let present = table_columns(conn, table.name)?;
        if present.is_empty() {
            return Err(StoreError::MissingTable(table.name));
        }
        for column in table.columns {
            if !present.iter().any(|c| c.eq_ignore_ascii_case(column)) {
                return Err(StoreError::MissingColumn {
                    table: table.name,
                    column,
                });
            }
        }
    }
    Ok(())
}

fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>, StoreError> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1)")?;
    let names = stmt
        .query_map([table], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names)
}

/// Row counts for both tables, used by the `check` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetCounts {
    pub measurements: u64,
    pub stations: u64,
}

pub fn count_rows(conn: &Connection) -> Result<DatasetCounts, StoreError> {
    let measurements: i64 =
        conn.query_row("SELECT COUNT(*) FROM measurement", [], |row| row.get(0))?;
    let stations: i64 = conn.query_row("SELECT COUNT(*) FROM station", [], |row| row.get(0))?;
    Ok(DatasetCounts {
        measurements: u64::try_from(measurements).unwrap_or(0),
        stations: u64::try_from(stations).unwrap_or(0),
    })
}

/// DDL matching the shipped dataset. Only used to build fixtures in tests.
#[cfg(test)]
pub(crate) const TEST_SCHEMA: &str = "
    CREATE TABLE measurement (
        id INTEGER PRIMARY KEY,
        station TEXT,
        date TEXT,
        prcp FLOAT,
        tobs FLOAT
    );
    CREATE TABLE station (
        id INTEGER PRIMARY KEY,
        station TEXT,
        name TEXT,
        latitude FLOAT,
        longitude FLOAT,
        elevation FLOAT
    );";
