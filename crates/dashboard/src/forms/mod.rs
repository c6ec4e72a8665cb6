//! Seller forms.
//!
//! Every form is a validate-then-submit pipeline:
//!
//! 1. The collected values are checked locally. Any failure comes back as
//!    [`Submitted::Invalid`] with per-field messages and nothing is sent.
//! 2. Otherwise the form issues its request (or an upload followed by the
//!    dependent create/update).
//! 3. On success it shows a notification and navigates. On a backend error
//!    it shows the server's message and returns [`Submitted::Rejected`],
//!    leaving the form and its values as they were.
//!
//! Failures the seller cannot act on come back as `Err`:
//! [`ApiError::Intercepted`] after the session guard redirected,
//! [`ApiError::Cancelled`] when the screen was left, and
//! [`ApiError::Unknown`] for transport problems.

mod fields;
pub mod filter;
pub mod product;
pub mod session;
pub mod sign_up;

use std::sync::Arc;

pub use fields::{FieldErrors, Validator};

use crate::api::MarketplaceApi;
use crate::error::ApiError;
use crate::navigation::Navigator;
use crate::notify::Notifier;

pub const REQUIRED: &str = "Required field";
pub const INVALID_EMAIL: &str = "Not a valid email address";

/// Outcome of a submission that reached a decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submitted<T> {
    /// Local validation failed; no request was made.
    Invalid(FieldErrors),
    /// The backend refused; the message has been shown to the seller.
    Rejected(String),
    /// The request went through.
    Completed(T),
}

impl<T> Submitted<T> {
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    /// Field errors, if validation failed.
    #[must_use]
    pub const fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Invalid(errors) => Some(errors),
            _ => None,
        }
    }
}

pub type SubmitResult<T> = Result<Submitted<T>, ApiError>;

/// What a form needs to submit: the API plus the front-end's navigation
/// and notification sinks.
#[derive(Clone)]
pub struct FormContext {
    pub api: MarketplaceApi,
    pub navigator: Arc<dyn Navigator>,
    pub notifier: Arc<dyn Notifier>,
}

impl std::fmt::Debug for FormContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormContext")
            .field("api", &self.api)
            .finish_non_exhaustive()
    }
}

impl FormContext {
    #[must_use]
    pub fn new(
        api: MarketplaceApi,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            api,
            navigator,
            notifier,
        }
    }

    /// Turn a request error into a form outcome.
    ///
    /// Backend errors are shown and become `Rejected`; validation errors
    /// become `Invalid`; everything else is returned as `Err`.
    pub(crate) fn settle<T>(&self, error: ApiError) -> SubmitResult<T> {
        match error {
            ApiError::Http { message, .. } => {
                self.notifier.error(&message);
                Ok(Submitted::Rejected(message))
            }
            ApiError::Validation(errors) => Ok(Submitted::Invalid(errors)),
            other => Err(other),
        }
    }
}

/// Minimal email shape check shared by the auth forms.
pub(crate) fn is_email(value: &str) -> bool {
    seller_panel_core::Email::parse(value).is_ok()
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::Notification;

    #[test]
    fn test_settle_shows_backend_message() {
        let (ctx, _, log) = test_support::offline_context();
        let outcome: SubmitResult<()> = ctx.settle(ApiError::Http {
            status: 409,
            message: "Email already in use.".into(),
        });
        assert_eq!(outcome.ok(), Some(Submitted::Rejected("Email already in use.".into())));
        assert_eq!(
            log.drain(),
            vec![Notification::Error("Email already in use.".into())]
        );
    }

    #[test]
    fn test_settle_passes_through_silent_errors() {
        let (ctx, _, log) = test_support::offline_context();
        let outcome: SubmitResult<()> = ctx.settle(ApiError::Intercepted);
        assert!(matches!(outcome, Err(ApiError::Intercepted)));
        let outcome: SubmitResult<()> = ctx.settle(ApiError::Cancelled);
        assert!(matches!(outcome, Err(ApiError::Cancelled)));
        assert!(log.is_empty());
    }
}
