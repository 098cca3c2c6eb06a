//! Queries over the `station` table.

use super::StoreError;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;

/// A weather-reporting location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Station {
    pub station: String,
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub elevation: Option<f64>,
}

/// The `{station, name}` projection served by the stations route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationName {
    pub station: String,
    pub name: String,
}

/// Every station with its coordinates, one row per distinct station id, in table order.
pub fn list_stations(conn: &Connection) -> Result<Vec<Station>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT station, name, latitude, longitude, elevation FROM station
         GROUP BY station
         ORDER BY MIN(rowid)",
    )?;

    let rows = stmt
        .query_map([], station_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// One `{station, name}` record per distinct station id, in table order.
pub fn station_names(conn: &Connection) -> Result<Vec<StationName>, StoreError> {
    Ok(list_stations(conn)?
        .into_iter()
        .map(|s| StationName {
            station: s.station,
            name: s.name,
        })
        .collect())
}

/// Look up a single station by id.
pub fn find_station(conn: &Connection, station: &str) -> Result<Option<Station>, StoreError> {
    let found = conn
        .query_row(
            "SELECT station, name, latitude, longitude, elevation FROM station
             WHERE station = ?1
             LIMIT 1",
            params![station],
            station_from_row,
        )
        .optional()?;
    Ok(found)
}

fn station_from_row(row: &Row<'_>) -> rusqlite::Result<Station> {
    Ok(Station {
        station: row.get(0)?,
        name: row.get(1)?,
        latitude: row.get(2)?,
        longitude: row.get(3)?,
        elevation: row.get(4)?,
    })
}
