//! Seller registration form.

use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use super::{FieldErrors, FormContext, INVALID_EMAIL, REQUIRED, SubmitResult, Submitted, Validator, is_email};
use crate::api::RegisterSeller;
use crate::navigation::{NavigationMode, Route};
use crate::upload::ImageUpload;

pub const MIN_PASSWORD_LEN: usize = 6;
pub const PASSWORD_TOO_SHORT: &str = "Must contain at least 6 characters";
pub const PASSWORDS_DO_NOT_MATCH: &str = "Passwords do not match, please check!";
pub const AVATAR_REQUIRED: &str = "Profile image is required.";

/// Values typed into the sign-up screen.
#[derive(Debug)]
pub struct SignUpForm {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password: SecretString,
    pub password_confirmation: SecretString,
    pub avatar: Option<ImageUpload>,
}

impl Default for SignUpForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            phone: String::new(),
            email: String::new(),
            password: SecretString::from(String::new()),
            password_confirmation: SecretString::from(String::new()),
            avatar: None,
        }
    }
}

impl SignUpForm {
    /// Check every field; on success hand back the avatar to upload.
    fn validate(&self) -> Result<ImageUpload, FieldErrors> {
        let password = self.password.expose_secret();
        let confirmation = self.password_confirmation.expose_secret();

        let mut v = Validator::new();
        v.check("name", !self.name.trim().is_empty(), REQUIRED)
            .check("phone", !self.phone.trim().is_empty(), REQUIRED)
            .check("email", is_email(self.email.trim()), INVALID_EMAIL)
            .check("password", password.chars().count() >= MIN_PASSWORD_LEN, PASSWORD_TOO_SHORT)
            .check(
                "password_confirmation",
                confirmation.chars().count() >= MIN_PASSWORD_LEN,
                PASSWORD_TOO_SHORT,
            )
            .check("password_confirmation", password == confirmation, PASSWORDS_DO_NOT_MATCH)
            .check("avatar", self.avatar.is_some(), AVATAR_REQUIRED);
        v.finish()?;

        self.avatar.clone().ok_or_else(|| {
            let mut errors = FieldErrors::new();
            errors.add("avatar", AVATAR_REQUIRED);
            errors
        })
    }

    /// Validate, upload the avatar, register, and go to sign-in with the
    /// email pre-filled.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for failures not shown to the seller (see
    /// [`crate::forms`]).
    #[instrument(skip_all, fields(email = %self.email.trim()))]
    pub async fn submit(&self, ctx: &FormContext) -> SubmitResult<()> {
        let avatar = match self.validate() {
            Ok(avatar) => avatar,
            Err(errors) => return Ok(Submitted::Invalid(errors)),
        };

        let attachments = match ctx.api.upload_attachments(vec![avatar]).await {
            Ok(attachments) => attachments,
            Err(err) => return ctx.settle(err),
        };

        let email = self.email.trim().to_string();
        let body = RegisterSeller {
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: email.clone(),
            avatar_id: attachments.first().map(|a| a.id),
            password: SecretString::from(self.password.expose_secret().to_string()),
            password_confirmation: SecretString::from(
                self.password_confirmation.expose_secret().to_string(),
            ),
        };

        if let Err(err) = ctx.api.register_seller(&body).await {
            return ctx.settle(err);
        }

        ctx.notifier.success("Seller registered successfully!");
        ctx.navigator
            .navigate(Route::SignIn { email: Some(email) }, NavigationMode::Push);
        Ok(Submitted::Completed(()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::forms::test_support::offline_context;

    fn valid() -> SignUpForm {
        SignUpForm {
            name: "Ana".into(),
            phone: "11999999999".into(),
            email: "ana@example.com".into(),
            password: SecretString::from("secret1".to_string()),
            password_confirmation: SecretString::from("secret1".to_string()),
            avatar: Some(ImageUpload::new("me.png", vec![1, 2, 3]).unwrap()),
        }
    }

    #[test]
    fn test_valid_form_passes() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_mismatch_flags_confirmation_only() {
        let form = SignUpForm {
            password_confirmation: SecretString::from("secret2".to_string()),
            ..valid()
        };
        let errors = form.validate().unwrap_err();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("password_confirmation"), Some(PASSWORDS_DO_NOT_MATCH));
        assert!(errors.get("password").is_none());
    }

    #[test]
    fn test_short_passwords() {
        let form = SignUpForm {
            password: SecretString::from("abc".to_string()),
            password_confirmation: SecretString::from("abc".to_string()),
            ..valid()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("password"), Some(PASSWORD_TOO_SHORT));
        assert_eq!(errors.get("password_confirmation"), Some(PASSWORD_TOO_SHORT));
    }

    #[test]
    fn test_avatar_required() {
        let form = SignUpForm {
            avatar: None,
            ..valid()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("avatar"), Some(AVATAR_REQUIRED));
    }

    #[tokio::test]
    async fn test_invalid_submit_sends_nothing() {
        let (ctx, _, log) = offline_context();
        let outcome = SignUpForm::default().submit(&ctx).await.unwrap();
        let errors = outcome.field_errors().unwrap();
        assert!(errors.contains("name"));
        assert!(errors.contains("avatar"));
        assert!(log.is_empty());
    }
}
