//! Queries over the `measurement` table: the latest recorded day, windowed
//! precipitation and temperature observations, and min/avg/max temperature
//! aggregates.

use super::StoreError;
use crate::window::{format_day, parse_day, DateWindow};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use serde::Serialize;

/// One `{date, precipitation}` row. Rows are not merged per day, so a day
/// reported by several stations appears several times.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrecipitationRecord {
    pub date: String,
    pub precipitation: Option<f64>,
}

/// One `{date, tobs}` temperature observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservationRecord {
    pub date: String,
    pub tobs: f64,
}

/// Min/avg/max temperature over a date range. All three are `None` when no
/// measurement falls in the range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TemperatureSummary {
    #[serde(rename = "Min Temperature")]
    pub min: Option<f64>,
    #[serde(rename = "Average Temperature")]
    pub avg: Option<f64>,
    #[serde(rename = "Max Temperature")]
    pub max: Option<f64>,
}

impl TemperatureSummary {
    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.avg.is_none() && self.max.is_none()
    }
}

/// Most recent day present in the dataset, or `None` if it has no rows.
pub fn latest_date(conn: &Connection) -> Result<Option<NaiveDate>, StoreError> {
    let latest: Option<String> =
        conn.query_row("SELECT MAX(date) FROM measurement", [], |row| row.get(0))?;

    latest
        .map(|raw| parse_day(&raw).map_err(|e| StoreError::CorruptDate(raw, e)))
        .transpose()
}

/// The `days`-long window ending at [`latest_date`].
pub fn trailing_window(conn: &Connection, days: u32) -> Result<Option<DateWindow>, StoreError> {
    Ok(latest_date(conn)?.map(|end| DateWindow::trailing(end, days)))
}

/// Every `(date, prcp)` pair inside `window`, oldest first.
pub fn precipitation_in(
    conn: &Connection,
    window: &DateWindow,
) -> Result<Vec<PrecipitationRecord>, StoreError> {
    let (start, end) = window.bounds();
    let mut stmt = conn.prepare(
        "SELECT date, prcp FROM measurement
         WHERE date >= ?1 AND date <= ?2
         ORDER BY date",
    )?;

    let rows = stmt
        .query_map(params![start, end], |row| {
            Ok(PrecipitationRecord {
                date: row.get(0)?,
                precipitation: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Temperature observations recorded by `station` inside `window`, oldest first.
pub fn observations_in(
    conn: &Connection,
    station: &str,
    window: &DateWindow,
) -> Result<Vec<ObservationRecord>, StoreError> {
    let (start, end) = window.bounds();
    let mut stmt = conn.prepare(
        "SELECT date, tobs FROM measurement
         WHERE date >= ?1 AND date <= ?2 AND station = ?3
         ORDER BY date",
    )?;

    let rows = stmt
        .query_map(params![start, end, station], |row| {
            Ok(ObservationRecord {
                date: row.get(0)?,
                tobs: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// TMIN/TAVG/TMAX for every measurement on or after `start`, and on or
/// before `end` when given. A reversed range is not rejected; it simply
/// matches nothing.
pub fn temperature_summary(
    conn: &Connection,
    start: NaiveDate,
    end: Option<NaiveDate>,
) -> Result<TemperatureSummary, StoreError> {
    let start = format_day(start);
    let summary = match end {
        Some(end) => conn.query_row(
            "SELECT MIN(tobs), AVG(tobs), MAX(tobs) FROM measurement
             WHERE date >= ?1 AND date <= ?2",
            params![start, format_day(end)],
            summary_from_row,
        )?,
        None => conn.query_row(
            "SELECT MIN(tobs), AVG(tobs), MAX(tobs) FROM measurement
             WHERE date >= ?1",
            params![start],
            summary_from_row,
        )?,
    };
    Ok(summary)
}

fn summary_from_row(row: &Row<'_>) -> rusqlite::Result<TemperatureSummary> {
    Ok(TemperatureSummary {
        min: row.get(0)?,
        avg: row.get(1)?,
        max: row.get(2)?,
    })
}
