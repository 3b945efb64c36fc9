//! Backend data access for GradTrack.
//!
//! Fetches JSON resources from the backend API with a bounded wait, keeps
//! successful responses in a short-lived cache, and substitutes
//! caller-supplied fallback data whenever a fetch fails.

pub mod cache;
pub mod client;
pub mod error;
pub mod resources;

pub use cache::{CacheEntry, ResponseCache};
pub use client::{DataClient, FetchOptions};
pub use error::FetchError;
