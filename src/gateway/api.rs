//! Climate API handlers: `/`, precipitation, stations, tobs and the
//! temperature summaries.
//!
//! Each handler opens its own read-only connection on the blocking pool,
//! runs one query and drops the connection before responding.

use super::error::ApiError;
use super::AppState;
use crate::store::{
    self,
    measurement::{self, ObservationRecord, PrecipitationRecord, TemperatureSummary},
    station::{self, StationName},
    StoreError,
};
use crate::window::parse_day;
use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use rusqlite::Connection;

/// Paths advertised on `/`.
pub const ROUTES: &[&str] = &[
    "/api/v1.0/precipitation",
    "/api/v1.0/stations",
    "/api/v1.0/tobs",
    "/api/v1.0/<start>",
    "/api/v1.0/<start>/<end>",
];

pub fn route_listing() -> String {
    let mut listing = String::from("Available Routes:\n");
    for route in ROUTES {
        listing.push_str(route);
        listing.push('\n');
    }
    listing
}

/// Run `query` against a fresh dataset connection on the blocking pool.
async fn query_dataset<T, F>(state: &AppState, query: F) -> Result<T, ApiError>
where
    F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    let db_path = state.config.dataset.resolved_db_path();
    let result = tokio::task::spawn_blocking(move || {
        let conn = store::open_dataset(&db_path)?;
        query(&conn)
    })
    .await??;
    Ok(result)
}

fn parse_param(param: &'static str, value: &str) -> Result<NaiveDate, ApiError> {
    parse_day(value).map_err(|source| ApiError::InvalidDate {
        param,
        value: value.to_string(),
        source,
    })
}

/// GET /: plain-text list of available routes.
pub async fn list_routes() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        route_listing(),
    )
}

/// GET /api/v1.0/precipitation: `{date, precipitation}` rows over the trailing window.
pub async fn precipitation(
    State(state): State<AppState>,
) -> Result<Json<Vec<PrecipitationRecord>>, ApiError> {
    let window_days = state.config.dataset.window_days;
    let rows = query_dataset(&state, move |conn| {
        match measurement::trailing_window(conn, window_days)? {
            Some(window) => {
                tracing::debug!("Precipitation window {window}");
                measurement::precipitation_in(conn, &window)
            }
            None => Ok(Vec::new()),
        }
    })
    .await?;

    tracing::debug!("Precipitation: {} rows", rows.len());
    Ok(Json(rows))
}

/// GET /api/v1.0/stations: `{station, name}` for every station.
pub async fn stations(State(state): State<AppState>) -> Result<Json<Vec<StationName>>, ApiError> {
    let rows = query_dataset(&state, station::station_names).await?;
    tracing::debug!("Stations: {} rows", rows.len());
    Ok(Json(rows))
}

/// GET /api/v1.0/tobs: `{date, tobs}` for the configured station over the trailing window.
pub async fn tobs(
    State(state): State<AppState>,
) -> Result<Json<Vec<ObservationRecord>>, ApiError> {
    let window_days = state.config.dataset.window_days;
    let station_id = state.config.dataset.observation_station.clone();
    let rows = query_dataset(&state, move |conn| {
        match measurement::trailing_window(conn, window_days)? {
            Some(window) => {
                tracing::debug!("Observations for {station_id} over {window}");
                measurement::observations_in(conn, &station_id, &window)
            }
            None => Ok(Vec::new()),
        }
    })
    .await?;

    tracing::debug!("Observations: {} rows", rows.len());
    Ok(Json(rows))
}

/// GET /api/v1.0/{start}: TMIN/TAVG/TMAX for every day on or after `start`.
pub async fn start_date_temps(
    State(state): State<AppState>,
    Path(start): Path<String>,
) -> Result<Json<Vec<TemperatureSummary>>, ApiError> {
    let start = parse_param("start", &start)?;
    let summary =
        query_dataset(&state, move |conn| measurement::temperature_summary(conn, start, None))
            .await?;
    Ok(Json(vec![summary]))
}

/// GET /api/v1.0/{start}/{end}: TMIN/TAVG/TMAX for `start..=end`.
pub async fn start_end_range(
    State(state): State<AppState>,
    Path((start, end)): Path<(String, String)>,
) -> Result<Json<Vec<TemperatureSummary>>, ApiError> {
    let start = parse_param("start", &start)?;
    let end = parse_param("end", &end)?;
    let summary = query_dataset(&state, move |conn| {
        measurement::temperature_summary(conn, start, Some(end))
    })
    .await?;
    Ok(Json(vec![summary]))
}
