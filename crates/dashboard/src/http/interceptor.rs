//! Response interceptor chain.
//!
//! Every failed request is offered to the registered interceptors, in
//! registration order, before the error reaches the caller. An interceptor
//! either passes the error on (possibly rewritten) or consumes it, in which
//! case the caller receives [`ApiError::Intercepted`].
//!
//! Registration hands back a [`Subscription`]. Dropping it removes the
//! interceptor, so a screen that owns a subscription cannot leave a stale
//! handler behind when it goes away.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, Weak};

use tracing::debug;

use crate::error::ApiError;

/// What an interceptor decided to do with an error.
#[derive(Debug)]
pub enum Interception {
    /// Hand the error to the next interceptor (or the caller).
    Propagate(ApiError),
    /// The error has been dealt with; the caller gets [`ApiError::Intercepted`].
    Handled,
}

/// A hook on the HTTP client's error path.
pub trait ResponseInterceptor: Send + Sync {
    /// Inspect a failed request's error.
    fn on_error(&self, error: ApiError) -> Interception;
}

impl<F> ResponseInterceptor for F
where
    F: Fn(ApiError) -> Interception + Send + Sync,
{
    fn on_error(&self, error: ApiError) -> Interception {
        self(error)
    }
}

type Entry = (u64, Arc<dyn ResponseInterceptor>);

/// Ordered set of interceptors shared by all clones of an `HttpClient`.
#[derive(Default)]
pub(crate) struct InterceptorRegistry {
    next_id: AtomicU64,
    entries: RwLock<Vec<Entry>>,
}

impl InterceptorRegistry {
    pub(crate) fn subscribe(
        self: &Arc<Self>,
        interceptor: Arc<dyn ResponseInterceptor>,
    ) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, interceptor));
        debug!(interceptor_id = id, "Response interceptor registered");

        Subscription {
            id,
            registry: Arc::downgrade(self),
        }
    }

    fn remove(&self, id: u64) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        if entries.len() != before {
            debug!(interceptor_id = id, "Response interceptor removed");
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Run an error through the chain.
    pub(crate) fn dispatch(&self, error: ApiError) -> ApiError {
        // Snapshot so interceptors can (un)subscribe without deadlocking.
        let chain: Vec<Arc<dyn ResponseInterceptor>> = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, interceptor)| Arc::clone(interceptor))
            .collect();

        let mut error = error;
        for interceptor in chain {
            match interceptor.on_error(error) {
                Interception::Propagate(next) => error = next,
                Interception::Handled => return ApiError::Intercepted,
            }
        }
        error
    }
}

/// Handle for a registered interceptor. Dropping it unsubscribes.
#[must_use = "dropping a Subscription immediately unregisters the interceptor"]
pub struct Subscription {
    id: u64,
    registry: Weak<InterceptorRegistry>,
}

impl Subscription {
    /// Unregister the interceptor now.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    fn http(status: u16) -> ApiError {
        ApiError::Http {
            status,
            message: "nope".to_string(),
        }
    }

    #[test]
    fn test_empty_chain_returns_error_unchanged() {
        let registry = Arc::new(InterceptorRegistry::default());
        let err = registry.dispatch(http(500));
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn test_handled_short_circuits() {
        let registry = Arc::new(InterceptorRegistry::default());
        let later_calls = Arc::new(Mutex::new(0));

        let _first = registry.subscribe(Arc::new(|_err: ApiError| Interception::Handled));
        let counter = Arc::clone(&later_calls);
        let _second = registry.subscribe(Arc::new(move |err: ApiError| {
            *counter.lock().unwrap_or_else(PoisonError::into_inner) += 1;
            Interception::Propagate(err)
        }));

        assert!(matches!(registry.dispatch(http(401)), ApiError::Intercepted));
        assert_eq!(*later_calls.lock().unwrap_or_else(PoisonError::into_inner), 0);
    }

    #[test]
    fn test_interceptors_run_in_registration_order() {
        let registry = Arc::new(InterceptorRegistry::default());
        let _rewrite = registry.subscribe(Arc::new(|_err: ApiError| {
            Interception::Propagate(http(418))
        }));
        let _observe = registry.subscribe(Arc::new(|err: ApiError| {
            assert_eq!(err.status(), Some(418));
            Interception::Propagate(err)
        }));

        assert_eq!(registry.dispatch(http(500)).status(), Some(418));
    }

    #[test]
    fn test_drop_unsubscribes() {
        let registry = Arc::new(InterceptorRegistry::default());
        let subscription = registry.subscribe(Arc::new(|_err: ApiError| Interception::Handled));
        assert_eq!(registry.len(), 1);

        drop(subscription);
        assert_eq!(registry.len(), 0);
        assert_eq!(registry.dispatch(http(401)).status(), Some(401));
    }

    #[test]
    fn test_unsubscribe_out_of_order() {
        let registry = Arc::new(InterceptorRegistry::default());
        let a = registry.subscribe(Arc::new(|err: ApiError| Interception::Propagate(err)));
        let b = registry.subscribe(Arc::new(|err: ApiError| Interception::Propagate(err)));
        let c = registry.subscribe(Arc::new(|err: ApiError| Interception::Propagate(err)));

        b.unsubscribe();
        assert_eq!(registry.len(), 2);
        a.unsubscribe();
        c.unsubscribe();
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_subscription_outliving_registry_is_harmless() {
        let registry = Arc::new(InterceptorRegistry::default());
        let subscription = registry.subscribe(Arc::new(|_err: ApiError| Interception::Handled));
        drop(registry);
        drop(subscription);
    }
}
