//! Fetcher trait and structured error types.
//!
//! The Fetcher trait abstracts over the transport so the pipeline can run
//! against the live Fiscal Data API or a saved payload, and so tests can
//! inject fixture bodies.

use std::path::Path;

use thiserror::Error;

/// Structured error types for every pipeline stage.
///
/// All errors are fail-fast: nothing in the pipeline retries or recovers.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("format error in field '{field}': {reason} (value: {value:?})")]
    Format {
        field: String,
        value: String,
        reason: String,
    },

    #[error("duplicate record for {record_date} / {security_type} / {security_class}")]
    DuplicateRecord {
        record_date: String,
        security_type: String,
        security_class: String,
    },

    #[error("incomplete fetch: API reports {expected} rows but {received} were received")]
    IncompleteFetch { expected: u64, received: u64 },
}

impl DataError {
    pub(crate) fn format(field: &str, value: &str, reason: impl Into<String>) -> Self {
        DataError::Format {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Raw response from a single GET.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub url: String,
    pub status: u16,
    pub body: String,
}

/// Transport for a single blocking GET.
///
/// Implementations must surface non-2xx responses as
/// `DataError::HttpStatus` and transport failures as `DataError::Network`.
pub trait Fetcher {
    /// Human-readable name of this fetcher.
    fn name(&self) -> &str;

    /// Fetch the fully-formed `url` and return its body.
    fn get(&self, url: &str) -> Result<FetchResponse, DataError>;

    /// File the bodies are replayed from, when they do not come from the
    /// requested URL.
    fn input_path(&self) -> Option<&Path> {
        None
    }
}

/// Check a status code and turn non-2xx into an error.
pub fn ensure_success(url: &str, status: u16) -> Result<(), DataError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(DataError::HttpStatus {
            status,
            url: url.to_string(),
        })
    }
}
