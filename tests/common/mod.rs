#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use surfsup::config::Config;
use surfsup::gateway::{router, AppState};
use tempfile::TempDir;
use tower::ServiceExt;

pub const SCHEMA: &str = "
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

pub const STATIONS: &[(&str, &str, f64, f64, f64)] = &[
    ("USC00519397", "WAIKIKI 717.2, HI US", 21.2716, -157.8168, 3.0),
    ("USC00513117", "KANEOHE 838.1, HI US", 21.4234, -157.8015, 14.6),
    ("USC00519281", "WAIHEE 837.5, HI US", 21.45167, -157.84889, 32.9),
];

/// Latest day is 2017-08-23, so the trailing year starts on 2016-08-23.
pub const MEASUREMENTS: &[(&str, &str, Option<f64>, f64)] = &[
    ("USC00519397", "2016-08-22", Some(0.5), 77.0),
    ("USC00519397", "2016-08-23", Some(0.3), 78.0),
    ("USC00519281", "2016-08-23", Some(1.79), 77.0),
    ("USC00519397", "2016-08-24", Some(1.2), 79.0),
    ("USC00519281", "2016-08-24", None, 76.0),
    ("USC00519281", "2017-08-18", Some(0.06), 79.0),
    ("USC00519397", "2017-08-23", Some(0.0), 81.0),
    ("USC00513117", "2017-08-23", Some(0.0), 82.0),
];

pub struct Fixture {
    _dir: TempDir,
    pub db_path: PathBuf,
}

impl Fixture {
    pub fn new(measurements: &[(&str, &str, Option<f64>, f64)]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("hawaii.sqlite");
        write_dataset(&db_path, measurements);
        Self { _dir: dir, db_path }
    }

    pub fn standard() -> Self {
        Self::new(MEASUREMENTS)
    }

    pub fn config(&self) -> Config {
        let mut config = Config::default();
        config.dataset.db_path = self.db_path.to_string_lossy().into_owned();
        config
    }

    pub fn app(&self) -> Router {
        app_with(self.config())
    }
}

pub fn write_dataset(path: &Path, measurements: &[(&str, &str, Option<f64>, f64)]) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(SCHEMA).unwrap();
    for (station, name, lat, lon, elevation) in STATIONS {
        conn.execute(
            "INSERT INTO station (station, name, latitude, longitude, elevation)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![station, name, lat, lon, elevation],
        )
        .unwrap();
    }
    for (station, date, prcp, tobs) in measurements {
        conn.execute(
            "INSERT INTO measurement (station, date, prcp, tobs) VALUES (?1, ?2, ?3, ?4)",
            params![station, date, prcp, tobs],
        )
        .unwrap();
    }
}

pub fn app_with(config: Config) -> Router {
    router(AppState::new(config))
}

pub async fn get(app: Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let (status, body) = get(app, uri).await;
    (status, serde_json::from_str(&body).unwrap())
}
