//! Uploaded file reader.

use super::json::rows_from_payload;
use super::text::parse_delimited;
use crate::error::SourceError;
use crate::models::RawRow;
use std::path::Path;
use tracing::{debug, info};

/// Read a file into rows.
///
/// `.json` files are treated as an exported API payload, everything else
/// as comma-delimited text.
pub async fn read_rows(path: &Path) -> Result<Vec<RawRow>, SourceError> {
    info!("Reading records from: {}", path.display());

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let rows = if is_json {
        rows_from_payload(serde_json::from_str(&content)?)?
    } else {
        parse_delimited(&content)
    };

    debug!("Parsed {} rows from {}", rows.len(), path.display());
    Ok(rows)
}
