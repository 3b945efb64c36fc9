//! Time-to-live response cache.
//!
//! Entries are keyed by resource key and hold the raw JSON document, so one
//! cache serves every response type. Expired entries are removed lazily when
//! looked up; nothing sweeps the map in the background.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use gradtrack_core::clock::{Clock, SystemClock};
use serde_json::Value;

/// A cached response document and the moment it was stored.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub value: Value,
    pub stored_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Whether the entry is still valid at `now` for the given TTL.
    ///
    /// Valid while `now - stored_at <= ttl`. An entry stamped in the future
    /// (clock moved backwards) counts as fresh.
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        match (now - self.stored_at).to_std() {
            Ok(age) => age <= ttl,
            Err(_) => true,
        }
    }
}

/// In-memory cache of backend responses.
#[derive(Debug)]
pub struct ResponseCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    clock: Arc<dyn Clock>,
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl ResponseCache {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Look up a fresh entry, evicting it if it has expired.
    pub fn get(&self, key: &str, ttl: Duration) -> Option<Value> {
        let now = self.clock.now();
        let mut entries = self.lock();
        let fresh = entries.get(key)?.is_fresh(now, ttl);
        if fresh {
            entries.get(key).map(|e| e.value.clone())
        } else {
            entries.remove(key);
            tracing::debug!(key, "Cache entry expired");
            None
        }
    }

    /// Store a value stamped with the current time, replacing any previous
    /// entry for the key.
    pub fn insert(&self, key: &str, value: Value) {
        let entry = CacheEntry {
            value,
            stored_at: self.clock.now(),
        };
        self.lock().insert(key.to_string(), entry);
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of stored entries, expired ones included until looked up.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        // A panic while holding the lock cannot leave a half-written entry.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}
