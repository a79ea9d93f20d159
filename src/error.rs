//! Errors raised at the record source boundary.
//!
//! Parsing, normalization and aggregation never fail; only loading rows
//! from a file or the records API can.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Records API responded with {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("Invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unexpected payload shape: {0}")]
    Shape(String),
}
