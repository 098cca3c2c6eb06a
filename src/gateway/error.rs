//! Request errors and their HTTP status and JSON body.

use crate::store::StoreError;
use crate::window::DayError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid {param} date '{value}': expected YYYY-MM-DD")]
    InvalidDate {
        param: &'static str,
        value: String,
        #[source]
        source: DayError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    // The blocking query task panicked or was cancelled
    #[error("Dataset query did not complete")]
    Task(#[from] tokio::task::JoinError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidDate { .. } => StatusCode::BAD_REQUEST,
            Self::Store(_) | Self::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// `error: cause: cause` rendering for logs.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", error_chain(&self));
        } else {
            tracing::warn!("Rejected request: {self}");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::parse_day;

    #[test]
    fn invalid_date_is_a_client_error() {
        let source = parse_day("not-a-date").unwrap_err();
        let err = ApiError::InvalidDate {
            param: "start",
            value: "not-a-date".to_string(),
            source,
        };
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.to_string(),
            "Invalid start date 'not-a-date': expected YYYY-MM-DD"
        );
    }

    #[test]
    fn store_failures_are_server_errors() {
        let err = ApiError::from(StoreError::MissingTable("station"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn chain_includes_sources() {
        let source = parse_day("2017-13-01").unwrap_err();
        let err = StoreError::CorruptDate("2017-13-01".to_string(), source);
        let rendered = error_chain(&err);
        assert!(rendered.starts_with("Stored date '2017-13-01'"));
        assert!(rendered.matches(": ").count() >= 1);
    }
}
