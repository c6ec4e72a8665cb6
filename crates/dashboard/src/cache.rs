//! Query cache for API reads.
//!
//! Reads are cached under a [`CacheKey`] for the configured TTL. Mutations
//! invalidate the keys they make stale, so the next read goes back to the
//! backend.
//!
//! Every invalidation bumps a [`Generation`]. A read takes the generation
//! before sending its request and stores its result with
//! [`QueryCache::insert_fresh`], which drops the result if an invalidation
//! happened while the request was in flight.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use seller_panel_core::ProductId;
use tokio::sync::Mutex;
use tracing::debug;

use crate::api::types::{Category, DailyViews, Product, ProductListQuery, Seller};

/// Which counter on the metrics screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    SoldProducts,
    AvailableProducts,
    Views,
}

/// Cache key for API reads.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    SellerProfile,
    Product(ProductId),
    SellerProducts(ProductListQuery),
    Categories,
    Metric(MetricKind),
    ViewsPerDay,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Seller(Box<Seller>),
    Product(Box<Product>),
    Products(Vec<Product>),
    Categories(Vec<Category>),
    Amount(u64),
    ViewsPerDay(Vec<DailyViews>),
}

const MAX_ENTRIES: u64 = 1_000;

/// Invalidation count observed before a read was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation(u64);

/// Shared cache; clones see the same entries.
#[derive(Clone)]
pub struct QueryCache {
    entries: Cache<CacheKey, CacheValue>,
    generation: Arc<Mutex<u64>>,
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}

impl QueryCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        let entries = Cache::builder()
            .max_capacity(MAX_ENTRIES)
            .time_to_live(ttl)
            .support_invalidation_closures()
            .build();
        Self {
            entries,
            generation: Arc::new(Mutex::new(0)),
        }
    }

    /// Current generation; take it before sending the read it will guard.
    pub async fn generation(&self) -> Generation {
        Generation(*self.generation.lock().await)
    }

    pub async fn get(&self, key: &CacheKey) -> Option<CacheValue> {
        let value = self.entries.get(key).await;
        if value.is_some() {
            debug!(?key, "Cache hit");
        }
        value
    }

    pub async fn insert(&self, key: CacheKey, value: CacheValue) {
        self.entries.insert(key, value).await;
    }

    /// Store a read result unless something was invalidated since
    /// `fetched_at`. Returns whether it was stored.
    pub async fn insert_fresh(
        &self,
        key: CacheKey,
        value: CacheValue,
        fetched_at: Generation,
    ) -> bool {
        let current = self.generation.lock().await;
        if *current != fetched_at.0 {
            debug!(?key, "Discarding read that raced an invalidation");
            return false;
        }
        self.entries.insert(key, value).await;
        true
    }

    pub async fn contains(&self, key: &CacheKey) -> bool {
        self.entries.get(key).await.is_some()
    }

    pub async fn invalidate(&self, key: &CacheKey) {
        debug!(?key, "Cache invalidated");
        let mut generation = self.generation.lock().await;
        *generation += 1;
        self.entries.invalidate(key).await;
    }

    /// Drop every cached product list, whatever its filters.
    pub async fn invalidate_product_lists(&self) {
        debug!("Product list caches invalidated");
        let mut generation = self.generation.lock().await;
        *generation += 1;
        // Only fails if invalidation closures were not enabled at build time.
        if let Err(err) = self
            .entries
            .invalidate_entries_if(|key, _| matches!(key, CacheKey::SellerProducts(_)))
        {
            debug!(error = %err, "Falling back to full invalidation");
            self.entries.invalidate_all();
        }
    }

    /// Drop everything (sign-in, sign-out).
    pub async fn invalidate_all(&self) {
        let mut generation = self.generation.lock().await;
        *generation += 1;
        self.entries.invalidate_all();
        self.entries.run_pending_tasks().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache() -> QueryCache {
        QueryCache::new(Duration::from_secs(60))
    }

    #[tokio::test]
    async fn test_insert_get_invalidate() {
        let cache = cache();
        let key = CacheKey::Metric(MetricKind::Views);
        cache.insert(key.clone(), CacheValue::Amount(12)).await;

        assert!(matches!(cache.get(&key).await, Some(CacheValue::Amount(12))));
        cache.invalidate(&key).await;
        assert!(cache.get(&key).await.is_none());
    }

    #[tokio::test]
    async fn test_invalidate_product_lists_keeps_other_keys() {
        let cache = cache();
        let filtered = CacheKey::SellerProducts(ProductListQuery {
            search: Some("lamp".into()),
            status: None,
        });
        cache
            .insert(CacheKey::SellerProducts(ProductListQuery::default()), CacheValue::Products(vec![]))
            .await;
        cache.insert(filtered.clone(), CacheValue::Products(vec![])).await;
        cache.insert(CacheKey::Categories, CacheValue::Categories(vec![])).await;

        cache.invalidate_product_lists().await;

        assert!(!cache.contains(&filtered).await);
        assert!(
            !cache
                .contains(&CacheKey::SellerProducts(ProductListQuery::default()))
                .await
        );
        assert!(cache.contains(&CacheKey::Categories).await);
    }

    #[tokio::test]
    async fn test_read_racing_an_invalidation_is_not_stored() {
        let cache = cache();
        let key = CacheKey::SellerProducts(ProductListQuery::default());

        // A list fetch starts, then a product is created before it returns.
        let fetched_at = cache.generation().await;
        cache.invalidate_product_lists().await;

        assert!(!cache.insert_fresh(key.clone(), CacheValue::Products(vec![]), fetched_at).await);
        assert!(!cache.contains(&key).await);

        let fetched_at = cache.generation().await;
        assert!(cache.insert_fresh(key.clone(), CacheValue::Products(vec![]), fetched_at).await);
        assert!(cache.contains(&key).await);
    }

    #[tokio::test]
    async fn test_invalidate_all() {
        let cache = cache();
        cache.insert(CacheKey::ViewsPerDay, CacheValue::ViewsPerDay(vec![])).await;
        cache.invalidate_all().await;
        assert!(!cache.contains(&CacheKey::ViewsPerDay).await);
    }
}
