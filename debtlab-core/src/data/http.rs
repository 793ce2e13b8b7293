//! Blocking HTTP fetcher for the Fiscal Data API.
//!
//! One GET per call, no retries. The API needs no authentication.

use std::time::Duration;

use tracing::debug;

use super::provider::{ensure_success, DataError, FetchResponse, Fetcher};

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = concat!("debtlab/", env!("CARGO_PKG_VERSION"));

/// Fetcher backed by `reqwest::blocking`.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| DataError::Configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    pub fn with_defaults() -> Result<Self, DataError> {
        Self::new(Duration::from_secs(DEFAULT_TIMEOUT_SECS), DEFAULT_USER_AGENT)
    }
}

impl Fetcher for HttpFetcher {
    fn name(&self) -> &str {
        "fiscal_data_http"
    }

    fn get(&self, url: &str) -> Result<FetchResponse, DataError> {
        debug!(url, "GET");
        let resp = self.client.get(url).send().map_err(|e| {
            if e.is_timeout() {
                DataError::Network(format!("request timed out: {e}"))
            } else if e.is_connect() {
                DataError::Network(format!("connection failed: {e}"))
            } else {
                DataError::Network(e.to_string())
            }
        })?;

        let status = resp.status().as_u16();
        debug!(status, "response received");
        ensure_success(url, status)?;

        let body = resp
            .text()
            .map_err(|e| DataError::Network(format!("failed to read response body: {e}")))?;

        Ok(FetchResponse {
            url: url.to_string(),
            status,
            body,
        })
    }
}
