//! Backend client with timeout, cache and fallback.

use std::sync::Arc;
use std::time::Duration;

use gradtrack_core::clock::{Clock, SystemClock};
use gradtrack_core::config::BackendConfig;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache::ResponseCache;
use crate::error::FetchError;
use crate::resources;

/// Per-call fetch options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Consult and populate the cache.
    pub use_cache: bool,
    /// Upper bound on the whole request, body included.
    pub timeout: Duration,
    /// Maximum age of a cached entry that may be served.
    pub cache_ttl: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self::from(&BackendConfig::default())
    }
}

impl From<&BackendConfig> for FetchOptions {
    fn from(config: &BackendConfig) -> Self {
        Self {
            use_cache: config.use_cache,
            timeout: config.request_timeout(),
            cache_ttl: config.cache_ttl(),
        }
    }
}

impl FetchOptions {
    pub fn without_cache(mut self) -> Self {
        self.use_cache = false;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }
}

/// Client for the GradTrack backend API.
///
/// Every fetch resolves to a value: failures are logged and replaced by the
/// caller's fallback. Concurrent fetches of the same key are not coalesced;
/// each issues its own request and the last to finish owns the cache entry.
#[derive(Debug)]
pub struct DataClient {
    http: Client,
    base_url: String,
    cache: ResponseCache,
    defaults: FetchOptions,
    health_timeout: Duration,
}

impl DataClient {
    /// Build a client from configuration, using the system clock.
    pub fn new(config: &BackendConfig) -> Result<Self, FetchError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Build a client whose cache reads time from `clock`.
    ///
    /// No transport-level timeouts are set: the per-call bound in
    /// [`FetchOptions::timeout`] governs the whole request, connect included.
    pub fn with_clock(config: &BackendConfig, clock: Arc<dyn Clock>) -> Result<Self, FetchError> {
        let http = Client::builder()
            .pool_idle_timeout(Duration::from_secs(60))
            .user_agent(format!("gradtrack/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cache: ResponseCache::new(clock),
            defaults: FetchOptions::from(config),
            health_timeout: config.health_timeout(),
        })
    }

    /// The configured backend base URL.
    pub fn backend_url(&self) -> &str {
        &self.base_url
    }

    /// Options used when a caller has no preference.
    pub fn default_options(&self) -> FetchOptions {
        self.defaults
    }

    /// Fetch `resource_key` with the client's default options.
    pub async fn fetch_or<T: DeserializeOwned>(&self, resource_key: &str, fallback: T) -> T {
        self.fetch_with_fallback(resource_key, fallback, self.defaults)
            .await
    }

    /// Fetch and decode a resource, returning `fallback` on any failure.
    ///
    /// A fresh cache entry is served without touching the network. A
    /// response only counts as a success if its body decodes as `T`; only
    /// successes are cached.
    pub async fn fetch_with_fallback<T: DeserializeOwned>(
        &self,
        resource_key: &str,
        fallback: T,
        options: FetchOptions,
    ) -> T {
        if options.use_cache {
            if let Some(cached) = self.cache.get(resource_key, options.cache_ttl) {
                match serde_json::from_value::<T>(cached) {
                    Ok(value) => {
                        debug!(resource = resource_key, "Cache hit");
                        return value;
                    }
                    Err(e) => {
                        debug!(resource = resource_key, error = %e, "Cached document has a different shape, refetching");
                    }
                }
            }
        }

        let result = self
            .fetch_json(resource_key, options.timeout)
            .await
            .and_then(|doc| {
                let value = T::deserialize(&doc)?;
                Ok((doc, value))
            });

        match result {
            Ok((doc, value)) => {
                if options.use_cache {
                    self.cache.insert(resource_key, doc);
                }
                debug!(resource = resource_key, "Fetched from backend");
                value
            }
            Err(e) if e.is_timeout() => {
                warn!(resource = resource_key, error = %e, "Request timed out, using fallback data");
                fallback
            }
            Err(e) => {
                warn!(resource = resource_key, error = %e, "Fetch failed, using fallback data");
                fallback
            }
        }
    }

    /// Probe the backend health endpoint. Any failure reads as unhealthy.
    pub async fn check_health(&self) -> bool {
        match self.get(resources::HEALTH, self.health_timeout).await {
            Ok(_) => true,
            Err(e) => {
                debug!(error = %e, "Health check failed");
                false
            }
        }
    }

    /// Drop every cached response.
    pub fn clear_cache(&self) {
        self.cache.clear();
        info!("Response cache cleared");
    }

    /// Number of entries currently held in the cache.
    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }

    fn url_for(&self, resource_key: &str) -> String {
        if resource_key.starts_with('/') {
            format!("{}{}", self.base_url, resource_key)
        } else {
            format!("{}/{}", self.base_url, resource_key)
        }
    }

    async fn fetch_json(&self, resource_key: &str, timeout: Duration) -> Result<Value, FetchError> {
        let body = self.get(resource_key, timeout).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// GET a resource and read its body, bounded by `timeout` overall.
    async fn get(&self, resource_key: &str, timeout: Duration) -> Result<Vec<u8>, FetchError> {
        let url = self.url_for(resource_key);
        debug!(url = %url, "Fetching");

        let request = async {
            let response = self
                .http
                .get(&url)
                .header(CONTENT_TYPE, "application/json")
                .send()
                .await?;
            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status(status.as_u16()));
            }
            Ok::<_, FetchError>(response.bytes().await?.to_vec())
        };

        tokio::time::timeout(timeout, request)
            .await
            .map_err(|_| FetchError::Timeout(timeout))?
    }
}
