//! Product endpoints.

use seller_panel_core::{ProductId, ProductStatus};
use serde::de::IgnoredAny;
use tracing::{info, instrument};

use super::MarketplaceApi;
use super::types::{Product, ProductDraft, ProductEnvelope, ProductListQuery, ProductsEnvelope};
use crate::cache::{CacheKey, CacheValue};
use crate::error::ApiError;
use crate::http::ApiRequest;

impl MarketplaceApi {
    /// The signed-in seller's products (`GET /products/me`).
    ///
    /// # Errors
    ///
    /// Returns the request's `ApiError`.
    #[instrument(skip(self))]
    pub async fn seller_products(&self, query: &ProductListQuery) -> Result<Vec<Product>, ApiError> {
        let key = CacheKey::SellerProducts(query.clone());
        if let Some(CacheValue::Products(products)) = self.cache.get(&key).await {
            return Ok(products);
        }

        let generation = self.cache.generation().await;
        let request = ApiRequest::get("products/me")
            .query_opt("search", query.search.clone())
            .query_opt("status", query.status.map(|s| s.as_str()));
        let envelope: ProductsEnvelope = self.http.send(request).await?;

        self.cache
            .insert_fresh(key, CacheValue::Products(envelope.products.clone()), generation)
            .await;
        Ok(envelope.products)
    }

    /// One product (`GET /products/{id}`).
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` with status 404 if the product does not exist.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product(&self, id: ProductId) -> Result<Product, ApiError> {
        let key = CacheKey::Product(id);
        if let Some(CacheValue::Product(product)) = self.cache.get(&key).await {
            return Ok(*product);
        }

        let generation = self.cache.generation().await;
        let envelope: ProductEnvelope = self.http.send(ApiRequest::get(format!("products/{id}"))).await?;

        self.cache
            .insert_fresh(key, CacheValue::Product(Box::new(envelope.product.clone())), generation)
            .await;
        Ok(envelope.product)
    }

    /// Create a product (`POST /products`).
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the backend rejects the draft.
    #[instrument(skip(self, draft), fields(title = %draft.title))]
    pub async fn create_product(&self, draft: &ProductDraft) -> Result<Product, ApiError> {
        let envelope: ProductEnvelope = self
            .http
            .send(ApiRequest::post("products").json(draft)?)
            .await?;

        self.cache.invalidate_product_lists().await;
        info!(product_id = %envelope.product.id, "Product created");
        Ok(envelope.product)
    }

    /// Replace a product's details (`PUT /products/{id}`).
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the backend rejects the draft or the
    /// product belongs to someone else.
    #[instrument(skip(self, draft), fields(product_id = %id))]
    pub async fn edit_product(&self, id: ProductId, draft: &ProductDraft) -> Result<Product, ApiError> {
        let envelope: ProductEnvelope = self
            .http
            .send(ApiRequest::put(format!("products/{id}")).json(draft)?)
            .await?;

        self.cache.invalidate(&CacheKey::Product(id)).await;
        self.cache.invalidate_product_lists().await;
        info!("Product updated");
        Ok(envelope.product)
    }

    /// Move a product to another status (`PATCH /products/{id}/{status}`).
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the transition is refused (e.g. a
    /// cancelled product cannot be sold).
    #[instrument(skip(self), fields(product_id = %id, status = %status))]
    pub async fn change_product_status(&self, id: ProductId, status: ProductStatus) -> Result<(), ApiError> {
        let _: IgnoredAny = self
            .http
            .send(ApiRequest::patch(format!("products/{id}/{status}")))
            .await?;

        self.cache.invalidate(&CacheKey::Product(id)).await;
        self.cache.invalidate_product_lists().await;
        info!("Product status changed");
        Ok(())
    }
}
