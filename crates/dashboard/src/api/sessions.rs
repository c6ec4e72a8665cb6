//! Session endpoints.
//!
//! The backend keeps the session in a cookie; the client's cookie jar picks
//! it up on sign-in and sends it from then on.

use serde::de::IgnoredAny;
use tracing::{info, instrument};

use super::MarketplaceApi;
use super::types::SignInRequest;
use crate::error::ApiError;
use crate::http::ApiRequest;

impl MarketplaceApi {
    /// Open a session (`POST /sellers/sessions`).
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the credentials are rejected.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn sign_in(&self, credentials: &SignInRequest) -> Result<(), ApiError> {
        let _: IgnoredAny = self
            .http
            .send(ApiRequest::post("sellers/sessions").json(credentials)?)
            .await?;

        // Anything cached belongs to whoever was signed in before.
        self.cache.invalidate_all().await;
        info!("Signed in");
        Ok(())
    }

    /// Close the session (`POST /sign-out`).
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the backend refuses.
    #[instrument(skip(self))]
    pub async fn sign_out(&self) -> Result<(), ApiError> {
        let _: IgnoredAny = self.http.send(ApiRequest::post("sign-out")).await?;

        self.cache.invalidate_all().await;
        info!("Signed out");
        Ok(())
    }
}
