//! HTTP client for the marketplace API.
//!
//! [`HttpClient`] is the only place that talks to the network. It resolves
//! request paths against the configured base URL, keeps the session cookie
//! the backend sets on sign-in and sends it with every later request, and
//! routes every failure through the interceptor chain before handing it to
//! the caller.
//!
//! Cloning is cheap; clones share the connection pool, the cookie jar and
//! the interceptor chain.

mod interceptor;

use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

pub use interceptor::{Interception, ResponseInterceptor, Subscription};
use interceptor::InterceptorRegistry;

use crate::config::DashboardConfig;
use crate::error::ApiError;
use crate::upload::ImageUpload;

/// Body of an outgoing request.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    /// Files sent as repeated parts under one field name.
    Multipart {
        field: String,
        files: Vec<ImageUpload>,
    },
}

/// A request relative to the API base URL.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: RequestBody,
}

impl ApiRequest {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    #[must_use]
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    /// Append a query parameter.
    #[must_use]
    pub fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    /// Append a query parameter if there is a value.
    #[must_use]
    pub fn query_opt(self, key: &str, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unknown` if the value cannot be serialized.
    pub fn json<B: Serialize>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::Unknown(format!("failed to encode request body: {e}")))?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    /// Attach files as a multipart form.
    #[must_use]
    pub fn multipart(mut self, field: &str, files: Vec<ImageUpload>) -> Self {
        self.body = RequestBody::Multipart {
            field: field.to_string(),
            files,
        };
        self
    }

    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub const fn body(&self) -> &RequestBody {
        &self.body
    }
}

struct Inner {
    client: Client,
    base_url: Url,
    interceptors: Arc<InterceptorRegistry>,
}

/// Marketplace API client.
#[derive(Clone)]
pub struct HttpClient {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("interceptors", &self.inner.interceptors.len())
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Create a client for the configured API.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unknown` if the underlying HTTP client cannot be
    /// built (e.g. TLS backend initialization fails).
    pub fn new(config: &DashboardConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(config.timeout)
            .user_agent(concat!("seller-panel/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(Inner {
                client,
                base_url: config.api_url.clone(),
                interceptors: Arc::new(InterceptorRegistry::default()),
            }),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Register a response interceptor. It stays active until the returned
    /// [`Subscription`] is dropped.
    pub fn intercept(&self, interceptor: Arc<dyn ResponseInterceptor>) -> Subscription {
        self.inner.interceptors.subscribe(interceptor)
    }

    /// Number of interceptors currently registered.
    #[must_use]
    pub fn interceptor_count(&self) -> usize {
        self.inner.interceptors.len()
    }

    /// Send a request and decode the JSON response.
    ///
    /// An empty success body decodes as JSON `null`, so `()` works for
    /// endpoints that return nothing.
    ///
    /// # Errors
    ///
    /// Returns the error left after the interceptor chain has seen it:
    /// `ApiError::Http` for non-success responses, `ApiError::Intercepted`
    /// when an interceptor consumed the failure, `ApiError::Unknown` for
    /// transport or decoding failures.
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        match self.execute(request).await {
            Ok(value) => Ok(value),
            Err(err) => Err(self.inner.interceptors.dispatch(err)),
        }
    }

    async fn execute<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let url = self.resolve(&request.path)?;

        let mut builder = self.inner.client.request(request.method, url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart { field, files } => builder.multipart(multipart_form(&field, files)?),
        };

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let err = ApiError::from_response(status, &body);
            debug!(status = status.as_u16(), error = %err, "Request failed");
            return Err(err);
        }

        debug!(status = status.as_u16(), bytes = body.len(), "Request succeeded");

        let body = if body.trim().is_empty() { "null" } else { body.as_str() };
        serde_json::from_str(body)
            .map_err(|e| ApiError::Unknown(format!("failed to decode response: {e}")))
    }

    fn resolve(&self, path: &str) -> Result<Url, ApiError> {
        self.inner
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::Unknown(format!("invalid request path {path}: {e}")))
    }
}

fn multipart_form(field: &str, files: Vec<ImageUpload>) -> Result<Form, ApiError> {
    files.into_iter().try_fold(Form::new(), |form, file| {
        let part = Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(file.content_type)?;
        Ok(form.part(field.to_string(), part))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> HttpClient {
        HttpClient::new(&DashboardConfig::new(base).unwrap()).unwrap()
    }

    #[test]
    fn test_resolve_keeps_base_path() {
        let http = client("https://api.example.com/v1");
        assert_eq!(
            http.resolve("/products/me").unwrap().as_str(),
            "https://api.example.com/v1/products/me"
        );
        assert_eq!(
            http.resolve("sellers/sessions").unwrap().as_str(),
            "https://api.example.com/v1/sellers/sessions"
        );
    }

    #[test]
    fn test_query_opt_skips_missing_values() {
        let request = ApiRequest::get("/products/me")
            .query_opt("search", Some("lamp"))
            .query_opt("status", None::<String>);
        assert_eq!(request.query, vec![("search".to_string(), "lamp".to_string())]);
    }

    #[test]
    fn test_json_body() {
        let request = ApiRequest::post("/sellers/sessions")
            .json(&serde_json::json!({"email": "a@b.co"}))
            .unwrap();
        assert!(matches!(request.body(), RequestBody::Json(v) if v["email"] == "a@b.co"));
        assert_eq!(request.method(), &Method::POST);
    }

    #[test]
    fn test_clones_share_interceptors() {
        let http = client("http://127.0.0.1:1");
        let other = http.clone();
        let subscription = http.intercept(Arc::new(|err: ApiError| Interception::Propagate(err)));
        assert_eq!(other.interceptor_count(), 1);
        drop(subscription);
        assert_eq!(other.interceptor_count(), 0);
    }

    #[tokio::test]
    async fn test_transport_failure_goes_through_chain() {
        // Port 1 is never listening; the connection is refused.
        let http = client("http://127.0.0.1:1");
        let _sub = http.intercept(Arc::new(|err: ApiError| match err {
            ApiError::Unknown(_) => Interception::Propagate(ApiError::Unknown("seen".into())),
            other => Interception::Propagate(other),
        }));

        let result: Result<(), ApiError> = http.send(ApiRequest::get("/sellers/me")).await;
        assert!(matches!(result, Err(ApiError::Unknown(msg)) if msg == "seen"));
    }
}
