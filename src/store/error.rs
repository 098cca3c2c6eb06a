//! Errors raised while opening or querying the dataset.

use crate::window::DayError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to open dataset '{0}'")]
    Open(PathBuf, #[source] rusqlite::Error),

    #[error("Dataset query failed")]
    Query(#[from] rusqlite::Error),

    #[error("Dataset has no '{0}' table")]
    MissingTable(&'static str),

    #[error("Dataset table '{table}' has no '{column}' column")]
    MissingColumn {
        table: &'static str,
        column: &'static str,
    },

    // Stored dates are TEXT; anything not YYYY-MM-DD is a broken dataset, not bad input
    #[error("Stored date '{0}' is not a YYYY-MM-DD calendar day")]
    CorruptDate(String, #[source] DayError),
}
