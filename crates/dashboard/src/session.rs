//! Session guard for authenticated screens.
//!
//! While a protected screen is shown it holds a [`SessionGuard`]. The guard
//! registers an interceptor on the [`HttpClient`] that watches for
//! `401 Unauthorized`: the first sign that the backend session has expired.
//! On one it sends the seller back to sign-in, replacing the current history
//! entry so "back" cannot return to the dead session, and swallows the error.
//! Everything else goes on to the caller untouched. Expiry is recognised
//! by the 401 status alone, whatever message the backend puts in the body.
//!
//! Leaving the screen drops the guard, which unregisters the interceptor.

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::ApiError;
use crate::http::{HttpClient, Interception, ResponseInterceptor, Subscription};
use crate::navigation::{NavigationMode, Navigator, Route};

/// Whether a guard is currently intercepting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Attached,
    Detached,
}

struct RedirectOnUnauthorized {
    navigator: Arc<dyn Navigator>,
}

impl ResponseInterceptor for RedirectOnUnauthorized {
    fn on_error(&self, error: ApiError) -> Interception {
        if !error.is_unauthorized() {
            return Interception::Propagate(error);
        }

        warn!(
            reason = error.display_message().unwrap_or_default(),
            "Session rejected by the API, redirecting to sign-in"
        );
        self.navigator
            .navigate(Route::auth_failure_redirect(), NavigationMode::Replace);
        Interception::Handled
    }
}

/// Mount-scoped 401 handler.
#[derive(Debug)]
pub struct SessionGuard {
    subscription: Option<Subscription>,
}

impl SessionGuard {
    /// Start guarding requests made through `client` (and its clones).
    pub fn attach(client: &HttpClient, navigator: Arc<dyn Navigator>) -> Self {
        let subscription = client.intercept(Arc::new(RedirectOnUnauthorized { navigator }));
        info!("Session guard attached");
        Self {
            subscription: Some(subscription),
        }
    }

    #[must_use]
    pub const fn state(&self) -> GuardState {
        if self.subscription.is_some() {
            GuardState::Attached
        } else {
            GuardState::Detached
        }
    }

    /// Stop intercepting. Idempotent; dropping the guard does the same.
    pub fn detach(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
            info!("Session guard detached");
        }
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::navigation::History;

    fn http(status: u16, message: &str) -> ApiError {
        ApiError::Http {
            status,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_redirects_on_401_regardless_of_wording() {
        let history = Arc::new(History::starting_at(Route::Dashboard));
        let interceptor = RedirectOnUnauthorized {
            navigator: history.clone(),
        };

        assert!(matches!(
            interceptor.on_error(http(401, "Token expired")),
            Interception::Handled
        ));
        assert_eq!(history.entries(), vec![Route::sign_in()]);
    }

    #[test]
    fn test_other_errors_propagate_unchanged() {
        let history = Arc::new(History::starting_at(Route::Dashboard));
        let interceptor = RedirectOnUnauthorized {
            navigator: history.clone(),
        };

        for err in [
            http(403, "Unauthorized"),
            http(500, "Internal Server Error"),
            ApiError::Unknown("connection reset".into()),
        ] {
            let expected = err.to_string();
            match interceptor.on_error(err) {
                Interception::Propagate(out) => assert_eq!(out.to_string(), expected),
                Interception::Handled => panic!("must not be handled"),
            }
        }
        assert_eq!(history.entries(), vec![Route::Dashboard]);
    }

    #[test]
    fn test_attach_detach_lifecycle() {
        let config = crate::config::DashboardConfig::new("http://127.0.0.1:1").unwrap();
        let client = HttpClient::new(&config).unwrap();
        let history = Arc::new(History::new());

        let mut guard = SessionGuard::attach(&client, history);
        assert_eq!(guard.state(), GuardState::Attached);
        assert_eq!(client.interceptor_count(), 1);

        guard.detach();
        guard.detach();
        assert_eq!(guard.state(), GuardState::Detached);
        assert_eq!(client.interceptor_count(), 0);
    }

    #[test]
    fn test_drop_detaches() {
        let config = crate::config::DashboardConfig::new("http://127.0.0.1:1").unwrap();
        let client = HttpClient::new(&config).unwrap();

        let first = SessionGuard::attach(&client, Arc::new(History::new()));
        drop(first);
        let _second = SessionGuard::attach(&client, Arc::new(History::new()));
        assert_eq!(client.interceptor_count(), 1);
    }
}
