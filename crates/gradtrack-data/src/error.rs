//! Errors raised inside the data client.
//!
//! None of these reach callers of `fetch_with_fallback`; they are logged and
//! replaced by the fallback value.

use std::time::Duration;

/// A failed attempt to fetch a backend resource.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
    #[error("backend returned HTTP {0}")]
    Status(u16),
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Timeout(_))
    }
}
