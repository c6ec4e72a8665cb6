//! Seller endpoints.

use tracing::{debug, instrument};

use super::MarketplaceApi;
use super::types::{RegisterSeller, Seller, SellerEnvelope};
use crate::cache::{CacheKey, CacheValue};
use crate::error::ApiError;
use crate::http::ApiRequest;

impl MarketplaceApi {
    /// Register a seller account (`POST /sellers`).
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the backend rejects the registration
    /// (e.g. email or phone already in use).
    #[instrument(skip(self, body), fields(email = %body.email))]
    pub async fn register_seller(&self, body: &RegisterSeller) -> Result<Seller, ApiError> {
        let envelope: SellerEnvelope = self
            .http
            .send(ApiRequest::post("sellers").json(body)?)
            .await?;
        Ok(envelope.seller)
    }

    /// Profile of the signed-in seller (`GET /sellers/me`).
    ///
    /// # Errors
    ///
    /// Returns the request's `ApiError`; a 401 here means the session is gone.
    #[instrument(skip(self))]
    pub async fn seller_profile(&self) -> Result<Seller, ApiError> {
        if let Some(CacheValue::Seller(seller)) = self.cache.get(&CacheKey::SellerProfile).await {
            return Ok(*seller);
        }

        let generation = self.cache.generation().await;
        let envelope: SellerEnvelope = self.http.send(ApiRequest::get("sellers/me")).await?;
        debug!(seller_id = %envelope.seller.id, "Fetched seller profile");

        self.cache
            .insert_fresh(
                CacheKey::SellerProfile,
                CacheValue::Seller(Box::new(envelope.seller.clone())),
                generation,
            )
            .await;

        Ok(envelope.seller)
    }
}
