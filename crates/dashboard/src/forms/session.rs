//! Sign-in form and sign-out action.

use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use super::{FormContext, INVALID_EMAIL, REQUIRED, SubmitResult, Submitted, Validator, is_email};
use crate::api::SignInRequest;
use crate::navigation::{NavigationMode, Route};

/// Values typed into the sign-in screen.
#[derive(Debug)]
pub struct SignInForm {
    pub email: String,
    pub password: SecretString,
}

impl Default for SignInForm {
    fn default() -> Self {
        Self {
            email: String::new(),
            password: SecretString::from(String::new()),
        }
    }
}

impl SignInForm {
    /// Empty form, with the email pre-filled when the route carries one
    /// (arriving from sign-up).
    #[must_use]
    pub fn for_route(route: &Route) -> Self {
        let email = match route {
            Route::SignIn { email: Some(email) } => email.clone(),
            _ => String::new(),
        };
        Self {
            email,
            ..Self::default()
        }
    }

    fn validate(&self) -> Validator {
        let email = self.email.trim();
        let mut v = Validator::new();
        v.check("email", !email.is_empty(), REQUIRED)
            .check("email", is_email(email), INVALID_EMAIL)
            .check("password", !self.password.expose_secret().is_empty(), REQUIRED);
        v
    }

    /// Validate, sign in, and go to the dashboard.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for failures not shown to the seller (see
    /// [`crate::forms`]).
    #[instrument(skip_all, fields(email = %self.email.trim()))]
    pub async fn submit(&self, ctx: &FormContext) -> SubmitResult<()> {
        if let Err(errors) = self.validate().finish() {
            return Ok(Submitted::Invalid(errors));
        }

        let credentials = SignInRequest {
            email: self.email.trim().to_string(),
            password: SecretString::from(self.password.expose_secret().to_string()),
        };

        if let Err(err) = ctx.api.sign_in(&credentials).await {
            return ctx.settle(err);
        }

        ctx.notifier.success("Signed in successfully!");
        ctx.navigator.navigate(Route::Dashboard, NavigationMode::Push);
        Ok(Submitted::Completed(()))
    }
}

/// Header sign-out action: end the session and go to sign-in.
///
/// # Errors
///
/// Returns `ApiError` for failures not shown to the seller.
#[instrument(skip_all)]
pub async fn sign_out(ctx: &FormContext) -> SubmitResult<()> {
    if let Err(err) = ctx.api.sign_out().await {
        return ctx.settle(err);
    }

    ctx.navigator.navigate(Route::sign_in(), NavigationMode::Push);
    Ok(Submitted::Completed(()))
}
