//! Data acquisition: request building, fetching, parsing, normalization.

pub mod download;
pub mod http;
pub mod normalize;
pub mod parse;
pub mod provider;
pub mod request;
pub mod static_source;

pub use download::{download, Download, PageMode};
pub use http::HttpFetcher;
pub use normalize::{normalize, parse_amount, parse_date, DATE_FORMAT};
pub use parse::{parse_body, PageMeta, ParsedPage, RawRecord};
pub use provider::{DataError, FetchResponse, Fetcher};
pub use request::{QueryOptions, RequestBuilder, ResponseFormat};
pub use static_source::StaticFetcher;
