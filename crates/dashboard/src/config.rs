//! Dashboard configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SELLER_PANEL_API_URL` - Base URL of the marketplace REST API (http or https)
//!
//! ## Optional
//! - `SELLER_PANEL_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `SELLER_PANEL_CACHE_TTL_SECS` - Query cache time-to-live (default: 60)

use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CACHE_TTL_SECS: u64 = 60;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Dashboard configuration.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Base URL of the marketplace API, always ending in `/`
    pub api_url: Url,
    /// Timeout applied to every request
    pub timeout: Duration,
    /// How long fetched queries stay cached
    pub cache_ttl: Duration,
}

impl DashboardConfig {
    /// Build a configuration for the given API URL with default timings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the URL does not parse or is
    /// not http(s).
    pub fn new(api_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: parse_api_url("SELLER_PANEL_API_URL", api_url)?,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = get_required_env("SELLER_PANEL_API_URL")?;
        Self::from_env_with_url(&api_url)
    }

    /// Load the optional settings from the environment around an API URL
    /// that came from elsewhere (e.g. a command-line flag).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if any value is invalid.
    pub fn from_env_with_url(api_url: &str) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let timeout = get_secs_or_default("SELLER_PANEL_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        let cache_ttl = get_secs_or_default("SELLER_PANEL_CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS)?;

        Ok(Self {
            api_url: parse_api_url("SELLER_PANEL_API_URL", api_url)?,
            timeout,
            cache_ttl,
        })
    }

    /// Override the cache time-to-live.
    #[must_use]
    pub const fn with_cache_ttl(mut self, cache_ttl: Duration) -> Self {
        self.cache_ttl = cache_ttl;
        self
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a number of seconds from the environment, falling back to a default.
fn get_secs_or_default(key: &str, default: u64) -> Result<Duration, ConfigError> {
    std::env::var(key).map_or(Ok(Duration::from_secs(default)), |raw| {
        parse_secs(key, &raw)
    })
}

fn parse_secs(key: &str, raw: &str) -> Result<Duration, ConfigError> {
    let secs = raw
        .trim()
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if secs == 0 {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be greater than zero".to_string(),
        ));
    }
    Ok(Duration::from_secs(secs))
}

/// Parse the API base URL, keeping its path as a directory so relative
/// joins append to it instead of replacing its last segment.
fn parse_api_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let mut url =
        Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_api_url_adds_trailing_slash() {
        let url = parse_api_url("K", "http://localhost:3333").unwrap();
        assert_eq!(url.as_str(), "http://localhost:3333/");

        let url = parse_api_url("K", "https://api.example.com/v1").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v1/");
        assert_eq!(
            url.join("products/me").unwrap().as_str(),
            "https://api.example.com/v1/products/me"
        );
    }

    #[test]
    fn test_parse_api_url_rejects_other_schemes() {
        let err = parse_api_url("K", "ftp://example.com").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "K"));
    }

    #[test]
    fn test_parse_api_url_rejects_garbage() {
        assert!(parse_api_url("K", "not a url").is_err());
    }

    #[test]
    fn test_parse_secs() {
        assert_eq!(parse_secs("K", "45").unwrap(), Duration::from_secs(45));
        assert!(parse_secs("K", "0").is_err());
        assert!(parse_secs("K", "soon").is_err());
    }

    #[test]
    fn test_new_uses_defaults() {
        let config = DashboardConfig::new("http://127.0.0.1:3333").unwrap();
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(config.cache_ttl, Duration::from_secs(DEFAULT_CACHE_TTL_SECS));
    }
}
