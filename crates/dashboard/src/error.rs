//! Unified error type for everything that talks to the marketplace API.
//!
//! Callers branch on the variant instead of probing the error at runtime:
//! only [`ApiError::Http`] carries a message meant for the seller.

use serde::Deserialize;
use thiserror::Error;

use crate::forms::FieldErrors;

/// Errors surfaced by the dashboard's request pipeline.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Local form validation failed; no request was made.
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    /// The backend answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Http {
        /// Status code from the error payload (or the response line).
        status: u16,
        /// Server-supplied message, for display only.
        message: String,
    },

    /// A response interceptor consumed the error (e.g. the session guard
    /// already redirected to sign-in).
    #[error("request intercepted after session expiry")]
    Intercepted,

    /// The screen that issued the request went away.
    #[error("request cancelled")]
    Cancelled,

    /// Transport, decoding or any other unexpected failure.
    #[error("unexpected error: {0}")]
    Unknown(String),
}

impl ApiError {
    /// HTTP status of the failure, if it came from the backend.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the backend rejected the session.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401))
    }

    /// Message to show in a notification, if this error has one.
    #[must_use]
    pub fn display_message(&self) -> Option<&str> {
        match self {
            Self::Http { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Build an error from a non-success response.
    ///
    /// The backend replies with `{ "statusCode": number, "message": string }`
    /// (validation failures send `message` as a list of strings). The status
    /// in the payload wins over the response line; when the body is not in
    /// that shape the response status and its canonical reason are used.
    #[must_use]
    pub fn from_response(status: reqwest::StatusCode, body: &str) -> Self {
        let fallback = || {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        };

        match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => Self::Http {
                status: parsed.status_code.unwrap_or_else(|| status.as_u16()),
                message: parsed.message.map_or_else(fallback, ErrorMessage::into_text),
            },
            Err(_) => Self::Http {
                status: status.as_u16(),
                message: fallback(),
            },
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::Unknown(format!("request timed out: {err}"));
        }
        Self::Unknown(err.to_string())
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

/// Error payload sent by the backend.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    status_code: Option<u16>,
    message: Option<ErrorMessage>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorMessage {
    Text(String),
    List(Vec<String>),
}

impl ErrorMessage {
    fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::List(items) => items.join("; "),
        }
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::*;

    #[test]
    fn test_from_response_uses_payload() {
        let err = ApiError::from_response(
            StatusCode::UNAUTHORIZED,
            r#"{"statusCode":401,"message":"Unauthorized"}"#,
        );
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.display_message(), Some("Unauthorized"));
        assert!(err.is_unauthorized());
    }

    #[test]
    fn test_from_response_payload_status_wins() {
        let err = ApiError::from_response(
            StatusCode::BAD_REQUEST,
            r#"{"statusCode":409,"message":"Email already in use."}"#,
        );
        assert_eq!(err.status(), Some(409));
    }

    #[test]
    fn test_from_response_joins_message_lists() {
        let err = ApiError::from_response(
            StatusCode::BAD_REQUEST,
            r#"{"statusCode":400,"message":["title should not be empty","priceInCents must be a number"]}"#,
        );
        assert_eq!(
            err.display_message(),
            Some("title should not be empty; priceInCents must be a number")
        );
    }

    #[test]
    fn test_from_response_non_json_body() {
        let err = ApiError::from_response(StatusCode::BAD_GATEWAY, "<html>upstream</html>");
        assert_eq!(err.status(), Some(502));
        assert_eq!(err.display_message(), Some("Bad Gateway"));
    }

    #[test]
    fn test_only_http_errors_have_display_messages() {
        assert_eq!(ApiError::Intercepted.display_message(), None);
        assert_eq!(ApiError::Cancelled.display_message(), None);
        assert_eq!(ApiError::Unknown("boom".into()).display_message(), None);
        assert!(!ApiError::Unknown("401".into()).is_unauthorized());
    }

    #[test]
    fn test_display() {
        let err = ApiError::Http {
            status: 404,
            message: "Product not found.".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 404: Product not found.");
    }
}
