//! Per-screen lifetime for in-flight requests.
//!
//! A [`ViewScope`] is created when a screen is shown and dropped when it is
//! left. Requests run through [`ViewScope::run`] resolve to
//! [`ApiError::Cancelled`] once the scope is gone, so a late response can
//! never update a screen that no longer exists.

use std::future::Future;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::ApiError;

/// Cancellation scope tied to one screen.
#[derive(Debug, Default)]
pub struct ViewScope {
    token: CancellationToken,
}

impl ViewScope {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a request inside this scope.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Cancelled` if the scope is cancelled before the
    /// request completes, otherwise whatever the request returns.
    pub async fn run<T, F>(&self, request: F) -> Result<T, ApiError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        if self.token.is_cancelled() {
            return Err(ApiError::Cancelled);
        }

        tokio::select! {
            biased;
            () = self.token.cancelled() => {
                debug!("Request dropped with its view");
                Err(ApiError::Cancelled)
            }
            result = request => result,
        }
    }

    /// Token for work spawned outside [`ViewScope::run`].
    #[must_use]
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
