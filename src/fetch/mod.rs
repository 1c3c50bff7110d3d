//! Controller REST access.
//!
//! Every network read in the crate goes through [`JsonSource`], so the
//! ingestors and the cost evaluator never see HTTP directly and tests can
//! serve canned JSON by URL.

pub mod http;

pub use http::HttpFetcher;

use serde_json::Value;

/// Reasons a JSON fetch produced no data.
///
/// Callers collapse all three into "unavailable"; the distinction only
/// matters for the log line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("failed to connect to {url}: {reason}")]
    Connection { url: String, reason: String },
    #[error("{url} returned status {status}")]
    HttpStatus { url: String, status: u16 },
    #[error("could not parse JSON from {url}: {reason}")]
    JsonDecode { url: String, reason: String },
}

impl FetchError {
    /// The URL the failed request was sent to
    pub fn url(&self) -> &str {
        match self {
            Self::Connection { url, .. }
            | Self::HttpStatus { url, .. }
            | Self::JsonDecode { url, .. } => url,
        }
    }
}

/// Anything that can answer a GET with parsed JSON.
///
/// Implementations must be shareable across the telemetry worker pool.
pub trait JsonSource: Sync {
    fn fetch_json(&self, url: &str) -> Result<Value, FetchError>;
}

impl<T: JsonSource + ?Sized> JsonSource for &T {
    fn fetch_json(&self, url: &str) -> Result<Value, FetchError> {
        (**self).fetch_json(url)
    }
}

/// Fetch a URL and log the failure, returning `None` when nothing usable came back.
pub fn fetch_or_log<S: JsonSource + ?Sized>(source: &S, url: &str) -> Option<Value> {
    match source.fetch_json(url) {
        Ok(value) => Some(value),
        Err(e) => {
            log::error!("{}", e);
            None
        }
    }
}
