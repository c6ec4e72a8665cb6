//! Category endpoint.

use tracing::instrument;

use super::MarketplaceApi;
use super::types::{CategoriesEnvelope, Category};
use crate::cache::{CacheKey, CacheValue};
use crate::error::ApiError;
use crate::http::ApiRequest;

impl MarketplaceApi {
    /// All categories (`GET /categories`).
    ///
    /// # Errors
    ///
    /// Returns the request's `ApiError`.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        if let Some(CacheValue::Categories(categories)) = self.cache.get(&CacheKey::Categories).await {
            return Ok(categories);
        }

        let generation = self.cache.generation().await;
        let envelope: CategoriesEnvelope = self.http.send(ApiRequest::get("categories")).await?;
        self.cache
            .insert_fresh(
                CacheKey::Categories,
                CacheValue::Categories(envelope.categories.clone()),
                generation,
            )
            .await;
        Ok(envelope.categories)
    }
}
