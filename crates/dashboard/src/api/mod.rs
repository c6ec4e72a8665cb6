//! Typed access to the marketplace REST API.
//!
//! [`MarketplaceApi`] layers one method per backend operation over the
//! [`HttpClient`], caching reads in a [`QueryCache`] and invalidating the
//! affected entries after each mutation.
//!
//! Operations are grouped by resource:
//! - [`sessions`] - sign-in and sign-out
//! - [`sellers`] - registration and the signed-in seller's profile
//! - [`products`] - the seller's listings
//! - [`categories`] - reference data for the product editor
//! - [`attachments`] - image upload
//! - [`metrics`] - dashboard counters and the daily views series

pub mod attachments;
pub mod categories;
pub mod metrics;
pub mod products;
pub mod sellers;
pub mod sessions;
pub mod types;

use std::time::Duration;

pub use types::*;

use crate::cache::QueryCache;
use crate::http::HttpClient;

/// Client for the marketplace API.
#[derive(Debug, Clone)]
pub struct MarketplaceApi {
    http: HttpClient,
    cache: QueryCache,
}

impl MarketplaceApi {
    /// Wrap an HTTP client, caching reads for `cache_ttl`.
    #[must_use]
    pub fn new(http: HttpClient, cache_ttl: Duration) -> Self {
        Self {
            http,
            cache: QueryCache::new(cache_ttl),
        }
    }

    /// The underlying HTTP client (for attaching a session guard).
    #[must_use]
    pub const fn http(&self) -> &HttpClient {
        &self.http
    }

    #[must_use]
    pub const fn cache(&self) -> &QueryCache {
        &self.cache
    }
}
