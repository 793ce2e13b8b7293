//! Download orchestrator: fetches and parses every page of a query.
//!
//! The reference request asks for one page large enough to hold the whole
//! series. That is an assumption about the server, so after fetching we
//! compare the number of rows received against `meta.total-count` and fail
//! with `DataError::IncompleteFetch` on any mismatch. In `AllPages` mode the
//! remaining pages reported by `meta.total-pages` are fetched in order first.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::parse::{parse_body, PageMeta, RawRecord};
use super::provider::{DataError, Fetcher};
use super::request::{RequestBuilder, ResponseFormat};

/// How many pages to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageMode {
    /// Follow `meta.total-pages` until every page is fetched.
    #[default]
    AllPages,
    /// Fetch only the configured page; still fail if it was truncated.
    SinglePage,
}

/// Everything fetched for one query, rows in wire order.
#[derive(Debug, Clone)]
pub struct Download {
    pub records: Vec<RawRecord>,
    /// Metadata of the first page fetched.
    pub meta: PageMeta,
    /// Raw bodies in fetch order, kept for fingerprinting and `--save-raw`.
    pub bodies: Vec<String>,
}

impl Download {
    pub fn pages_fetched(&self) -> usize {
        self.bodies.len()
    }
}

/// Fetch and parse the query described by `builder`.
pub fn download(
    fetcher: &dyn Fetcher,
    builder: &RequestBuilder,
    mode: PageMode,
) -> Result<Download, DataError> {
    if builder.options().format != ResponseFormat::Json {
        return Err(DataError::Configuration(format!(
            "the pipeline parses JSON responses only, but format '{}' was requested",
            builder.options().format.as_str()
        )));
    }

    let first_page = builder.options().page_number;
    let mut page = first_page;
    let mut records = Vec::new();
    let mut bodies = Vec::new();
    let mut first_meta: Option<PageMeta> = None;

    loop {
        let url = builder.build_page(page)?;
        info!(fetcher = fetcher.name(), page, "fetching");
        let resp = fetcher.get(&url)?;
        let parsed = parse_body(&resp.body)?;
        debug!(page, rows = parsed.records.len(), "page parsed");

        let total_pages = parsed.meta.total_pages.unwrap_or(1);
        if first_meta.is_none() {
            first_meta = Some(parsed.meta);
        }
        records.extend(parsed.records);
        bodies.push(resp.body);

        if mode == PageMode::SinglePage || (page as u64) >= total_pages {
            break;
        }
        page += 1;
    }

    let meta = first_meta.unwrap_or_default();
    verify_row_count(&meta, first_page, records.len())?;

    info!(
        rows = records.len(),
        pages = bodies.len(),
        total_count = ?meta.total_count,
        "download complete"
    );

    Ok(Download {
        records,
        meta,
        bodies,
    })
}

/// Compare rows received with the server's total count.
///
/// Only meaningful when the download started at page 1; otherwise the
/// earlier pages are intentionally skipped and there is nothing to compare.
fn verify_row_count(meta: &PageMeta, first_page: i64, received: usize) -> Result<(), DataError> {
    let Some(expected) = meta.total_count else {
        return Ok(());
    };
    if first_page != 1 {
        return Ok(());
    }
    let received = received as u64;
    if received != expected {
        return Err(DataError::IncompleteFetch { expected, received });
    }
    Ok(())
}
