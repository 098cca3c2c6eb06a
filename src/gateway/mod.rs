//! HTTP gateway: axum router, shared state and the serve loop.
//!
//! All API routes are mounted under `/api/v1.0` and, for clients of the
//! first release, under the `/api.v1.0` prefix it advertised.

pub mod api;
pub mod error;

pub use error::ApiError;

use crate::config::Config;
use anyhow::{Context, Result};
use axum::{routing::get, Json, Router};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer};

/// Prefixes the API routes are served under.
pub const API_PREFIXES: &[&str] = &["/api/v1.0", "/api.v1.0"];

/// The API is GET-only; anything with a body larger than this is rejected.
const MAX_BODY_BYTES: usize = 4 * 1024;

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

/// Build the full router with timeout and body-limit layers applied.
pub fn router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.gateway.request_timeout_secs);

    let mut app = Router::new()
        .route("/", get(api::list_routes))
        .route("/health", get(handle_health));

    for prefix in API_PREFIXES {
        app = app
            .route(&format!("{prefix}/precipitation"), get(api::precipitation))
            .route(&format!("{prefix}/stations"), get(api::stations))
            .route(&format!("{prefix}/tobs"), get(api::tobs))
            .route(&format!("{prefix}/{{start}}"), get(api::start_date_temps))
            .route(
                &format!("{prefix}/{{start}}/{{end}}"),
                get(api::start_end_range),
            );
    }

    app.layer(
        ServiceBuilder::new()
            .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
            .layer(TimeoutLayer::new(timeout)),
    )
    .with_state(state)
}

/// GET /health: liveness only, does not touch the dataset.
async fn handle_health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Bind the configured address and serve until Ctrl-C.
pub async fn run_gateway(config: Config) -> Result<()> {
    let db_path = config.dataset.resolved_db_path();
    if !db_path.is_file() {
        tracing::warn!(
            "Dataset {} does not exist yet; API routes will fail until it does",
            db_path.display()
        );
    }

    let host = config.gateway.host.as_str();
    let port = config.gateway.port;
    let listener = tokio::net::TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind {host}:{port}"))?;
    let addr = listener.local_addr()?;

    tracing::info!("SurfsUp gateway listening on http://{addr}");
    tracing::info!("Serving dataset {}", db_path.display());

    let app = router(AppState::new(config));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Gateway server error")?;

    tracing::info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {e}");
        // Without a signal handler there is nothing to wait on; keep serving.
        std::future::pending::<()>().await;
    }
}
