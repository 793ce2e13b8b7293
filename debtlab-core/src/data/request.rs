//! Request builder for the Fiscal Data API.
//!
//! Produces a single query URL of the form
//! `{base}{endpoint}?sort=..&format=..&page%5Bnumber%5D=..&page%5Bsize%5D=..&fields=..`.
//! Bracketed parameter names are always percent-encoded; field names are
//! encoded individually and joined with a literal comma.

use serde::{Deserialize, Serialize};
use url::form_urlencoded::byte_serialize;
use url::Url;

use super::provider::DataError;

pub const DEFAULT_BASE_URL: &str = "https://api.fiscaldata.treasury.gov/services/api/fiscal_service";
pub const MSPD_TABLE_1_ENDPOINT: &str = "/v1/debt/mspd/mspd_table_1";

/// Columns the pipeline needs from MSPD table 1.
pub const MSPD_FIELDS: [&str; 6] = [
    "record_date",
    "security_type_desc",
    "security_class_desc",
    "debt_held_public_amt",
    "intragov_hold_amt",
    "total_amt",
];

/// Page size large enough to hold the full series in one page.
pub const DEFAULT_PAGE_SIZE: i64 = 10_000;

/// Response encoding requested from the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    #[default]
    Json,
    Csv,
    Xml,
}

impl ResponseFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ResponseFormat::Json => "json",
            ResponseFormat::Csv => "csv",
            ResponseFormat::Xml => "xml",
        }
    }
}

/// Recognized query options.
///
/// Page numbers and sizes are signed so a bad configuration can be reported
/// as a `Configuration` error instead of failing at deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryOptions {
    /// Sort column, optionally prefixed with `-` for descending.
    pub sort: Option<String>,
    pub format: ResponseFormat,
    pub page_number: i64,
    pub page_size: i64,
    /// `None` requests every column; `Some` requests only these, in order.
    pub fields: Option<Vec<String>>,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            sort: Some("-record_date".into()),
            format: ResponseFormat::Json,
            page_number: 1,
            page_size: DEFAULT_PAGE_SIZE,
            fields: Some(MSPD_FIELDS.iter().map(|f| f.to_string()).collect()),
        }
    }
}

/// Builds request URLs for one endpoint.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    base_url: String,
    endpoint: String,
    options: QueryOptions,
}

impl RequestBuilder {
    pub fn new(
        base_url: impl Into<String>,
        endpoint: impl Into<String>,
        options: QueryOptions,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            endpoint: endpoint.into(),
            options,
        }
    }

    /// Builder for MSPD table 1 with the default options.
    pub fn mspd_table_1() -> Self {
        Self::new(DEFAULT_BASE_URL, MSPD_TABLE_1_ENDPOINT, QueryOptions::default())
    }

    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    /// Build the URL for the configured page.
    pub fn build(&self) -> Result<String, DataError> {
        self.build_page(self.options.page_number)
    }

    /// Build the URL for an explicit page, keeping every other option.
    pub fn build_page(&self, page_number: i64) -> Result<String, DataError> {
        let opts = &self.options;
        if page_number <= 0 {
            return Err(DataError::Configuration(format!(
                "page number must be positive, got {page_number}"
            )));
        }
        if opts.page_size <= 0 {
            return Err(DataError::Configuration(format!(
                "page size must be positive, got {}",
                opts.page_size
            )));
        }

        let endpoint_url = self.endpoint_url()?;

        let mut params: Vec<(&str, String)> = Vec::with_capacity(5);
        if let Some(sort) = opts.sort.as_deref().filter(|s| !s.is_empty()) {
            params.push(("sort", encode(sort)));
        }
        params.push(("format", opts.format.as_str().to_string()));
        params.push(("page[number]", page_number.to_string()));
        params.push(("page[size]", opts.page_size.to_string()));
        if let Some(fields) = &opts.fields {
            if fields.is_empty() {
                return Err(DataError::Configuration(
                    "field filtering requested with an empty field list".into(),
                ));
            }
            if let Some(blank) = fields.iter().position(|f| f.trim().is_empty()) {
                return Err(DataError::Configuration(format!(
                    "field list entry {blank} is blank"
                )));
            }
            let joined = fields
                .iter()
                .map(|f| encode(f.trim()))
                .collect::<Vec<_>>()
                .join(",");
            params.push(("fields", joined));
        }

        let query = params
            .iter()
            .map(|(name, value)| format!("{}={value}", encode(name)))
            .collect::<Vec<_>>()
            .join("&");

        Ok(format!("{endpoint_url}?{query}"))
    }

    /// Base URL and endpoint joined with exactly one slash, validated.
    fn endpoint_url(&self) -> Result<String, DataError> {
        let base = self.base_url.trim().trim_end_matches('/');
        let endpoint = self.endpoint.trim().trim_start_matches('/');
        let joined = if endpoint.is_empty() {
            base.to_string()
        } else {
            format!("{base}/{endpoint}")
        };

        let parsed = Url::parse(&joined)
            .map_err(|e| DataError::Configuration(format!("invalid base URL '{joined}': {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(DataError::Configuration(format!(
                "unsupported URL scheme '{}'",
                parsed.scheme()
            )));
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(DataError::Configuration(format!(
                "base URL '{joined}' must not carry a query string or fragment"
            )));
        }
        Ok(joined)
    }
}

fn encode(s: &str) -> String {
    byte_serialize(s.as_bytes()).collect()
}
