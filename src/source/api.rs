//! HTTP client for the document records API.

use super::json::rows_from_payload;
use crate::error::SourceError;
use crate::models::RawRow;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

/// Fetches already-analyzed document records from the backend.
pub struct ApiClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client with a per-request timeout.
    pub fn new(base_url: &str, timeout_seconds: u64) -> Result<Self, SourceError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Full URL for an endpoint path.
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    /// GET an endpoint and convert its payload into rows.
    pub async fn fetch_rows(&self, endpoint: &str) -> Result<Vec<RawRow>, SourceError> {
        let url = self.endpoint_url(endpoint);
        info!("Fetching records from: {}", url);

        let response = self.http_client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status { status, url });
        }

        let payload: Value = response.json().await?;
        let rows = rows_from_payload(payload)?;

        debug!("Fetched {} records from {}", rows.len(), url);
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url_joins_slashes() {
        let client = ApiClient::new("http://localhost:8000/", 5).unwrap();
        assert_eq!(
            client.endpoint_url("/api/checks"),
            "http://localhost:8000/api/checks"
        );
        assert_eq!(
            client.endpoint_url("api/paystubs"),
            "http://localhost:8000/api/paystubs"
        );
    }
}
