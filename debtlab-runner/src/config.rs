//! TOML configuration for a pipeline run.
//!
//! Every field is optional in the file; omitted fields take the values of
//! the reference request (MSPD table 1, sorted newest first, JSON, one page
//! of 10,000 rows, the six columns the pipeline needs).
//!
//! ```toml
//! [request]
//! page_size = 5000
//! page_mode = "single_page"
//!
//! [http]
//! timeout_secs = 60
//!
//! [analysis]
//! rolling_window = 6
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use debtlab_core::data::http::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use debtlab_core::data::request::{
    DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE, MSPD_FIELDS, MSPD_TABLE_1_ENDPOINT,
};
use debtlab_core::data::{PageMode, QueryOptions, RequestBuilder, ResponseFormat};

/// Errors from loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Complete run configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DebtLabConfig {
    pub request: RequestConfig,
    pub http: HttpConfig,
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RequestConfig {
    pub base_url: String,
    pub endpoint: String,
    /// Sort column; empty string disables sorting.
    pub sort: String,
    pub format: ResponseFormat,
    pub page_number: i64,
    pub page_size: i64,
    /// Columns to request; an empty list disables field filtering.
    pub fields: Vec<String>,
    pub page_mode: PageMode,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            endpoint: MSPD_TABLE_1_ENDPOINT.into(),
            sort: "-record_date".into(),
            format: ResponseFormat::Json,
            page_number: 1,
            page_size: DEFAULT_PAGE_SIZE,
            fields: MSPD_FIELDS.iter().map(|f| f.to_string()).collect(),
            page_mode: PageMode::AllPages,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.into(),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Months in the trailing mean of the growth series.
    pub rolling_window: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self { rolling_window: 12 }
    }
}

impl DebtLabConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that serde cannot. Request options are checked again
    /// by the request builder; this catches them before any I/O.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.timeout_secs == 0 {
            return Err(ConfigError::Invalid("http.timeout_secs must be positive".into()));
        }
        if self.analysis.rolling_window == 0 {
            return Err(ConfigError::Invalid(
                "analysis.rolling_window must be positive".into(),
            ));
        }
        self.request_builder()
            .build()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(())
    }

    pub fn query_options(&self) -> QueryOptions {
        let r = &self.request;
        QueryOptions {
            sort: Some(r.sort.clone()).filter(|s| !s.is_empty()),
            format: r.format,
            page_number: r.page_number,
            page_size: r.page_size,
            fields: Some(r.fields.clone()).filter(|f| !f.is_empty()),
        }
    }

    pub fn request_builder(&self) -> RequestBuilder {
        RequestBuilder::new(
            self.request.base_url.clone(),
            self.request.endpoint.clone(),
            self.query_options(),
        )
    }
}
