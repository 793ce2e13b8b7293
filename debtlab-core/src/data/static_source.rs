//! Fetcher that replays saved response bodies.
//!
//! Used for offline runs against a payload saved with `--save-raw` and as
//! the transport in tests. Bodies are served in order, one per request.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use super::provider::{DataError, FetchResponse, Fetcher};

pub struct StaticFetcher {
    bodies: RefCell<VecDeque<String>>,
    requests: RefCell<Vec<String>>,
    input_path: Option<PathBuf>,
}

impl StaticFetcher {
    pub fn new(bodies: Vec<String>) -> Self {
        Self {
            bodies: RefCell::new(bodies.into()),
            requests: RefCell::new(Vec::new()),
            input_path: None,
        }
    }

    /// Serve a single body read from disk.
    pub fn from_file(path: &Path) -> Result<Self, DataError> {
        let body = std::fs::read_to_string(path).map_err(|e| {
            DataError::Configuration(format!("cannot read input file {}: {e}", path.display()))
        })?;
        Ok(Self {
            input_path: Some(path.to_path_buf()),
            ..Self::new(vec![body])
        })
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl Fetcher for StaticFetcher {
    fn name(&self) -> &str {
        "static"
    }

    fn input_path(&self) -> Option<&Path> {
        self.input_path.as_deref()
    }

    fn get(&self, url: &str) -> Result<FetchResponse, DataError> {
        self.requests.borrow_mut().push(url.to_string());
        let body = self
            .bodies
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| DataError::Network(format!("no saved response left for {url}")))?;
        Ok(FetchResponse {
            url: url.to_string(),
            status: 200,
            body,
        })
    }
}
