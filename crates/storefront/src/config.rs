//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `AURELLE_API_BASE_URL` - Backend REST API base URL (e.g. `https://api.aurelle.in/api/`)
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//!
//! ## Optional
//! - `AURELLE_API_TIMEOUT_SECS` - Backend request timeout (default: 15)
//! - `AURELLE_API_TOKEN` - Bearer token used by the CLI
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_CONTENT_DIR` - Marketing pages directory (default: crates/storefront/content)
//! - `SEARCH_DEBOUNCE_MS` - Search-as-you-type quiet period (default: 300)
//! - `SEARCH_SUGGESTION_LIMIT` - Suggestions per query (default: 8)
//! - `RAZORPAY_KEY_ID` - Razorpay public key id for online payments
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Performance trace sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Directory holding `pages/*.md`
    pub content_dir: PathBuf,
    /// Backend API configuration
    pub api: ApiConfig,
    /// Search-as-you-type tuning
    pub search: SearchConfig,
    /// Payment gateway hand-off configuration
    pub payments: PaymentConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

/// Backend REST API configuration.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to
    pub base_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
    /// Bearer token for non-browser clients
    pub token: Option<SecretString>,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Search-as-you-type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Quiet period before a search is issued
    pub debounce: Duration,
    /// Maximum number of suggestions per query
    pub suggestion_limit: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            suggestion_limit: 8,
        }
    }
}

/// Payment gateway configuration.
#[derive(Debug, Clone, Default)]
pub struct PaymentConfig {
    /// Razorpay public key id (safe to expose in the browser)
    pub razorpay_key_id: Option<String>,
}

impl StorefrontConfig {
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

        let host = parse_env_or_default::<IpAddr>("STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_env_or_default::<u16>("STOREFRONT_PORT", "3000")?;
        let base_url = get_required_env("STOREFRONT_BASE_URL")?;
        let content_dir = PathBuf::from(get_env_or_default(
            "STOREFRONT_CONTENT_DIR",
            "crates/storefront/content",
        ));

        Ok(Self {
            host,
            port,
            base_url,
            content_dir,
            api: ApiConfig::from_env()?,
            search: SearchConfig::from_env()?,
            payments: PaymentConfig::from_env(),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env_or_default("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env_or_default("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies must be marked `Secure`.
    #[must_use]
    pub fn is_https(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl ApiConfig {
    /// Load the backend API settings on their own (used by the CLI).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the base URL is missing or malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let raw = get_required_env("AURELLE_API_BASE_URL")?;
        let base_url = Url::parse(&raw).map_err(|e| {
            ConfigError::InvalidEnvVar("AURELLE_API_BASE_URL".to_string(), e.to_string())
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidEnvVar(
                "AURELLE_API_BASE_URL".to_string(),
                "must be an absolute http(s) URL".to_string(),
            ));
        }
        let timeout_secs = parse_env_or_default::<u64>("AURELLE_API_TIMEOUT_SECS", "15")?;

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            token: get_optional_env("AURELLE_API_TOKEN").map(SecretString::from),
        })
    }
}

impl SearchConfig {
    /// Load the search settings on their own (used by the CLI).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a value does not parse or the limit is zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        let debounce_ms = parse_env_or_default::<u64>("SEARCH_DEBOUNCE_MS", "300")?;
        let suggestion_limit = parse_env_or_default::<u32>("SEARCH_SUGGESTION_LIMIT", "8")?;
        if suggestion_limit == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "SEARCH_SUGGESTION_LIMIT".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            debounce: Duration::from_millis(debounce_ms),
            suggestion_limit,
        })
    }
}

impl PaymentConfig {
    fn from_env() -> Self {
        Self {
            razorpay_key_id: get_optional_env("RAZORPAY_KEY_ID"),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to a default string.
fn parse_env_or_default<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_value(key, &get_env_or_default(key, default))
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> StorefrontConfig {
        StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            content_dir: PathBuf::from("content"),
            api: ApiConfig {
                base_url: Url::parse("http://localhost:5000/api/").unwrap(),
                timeout: Duration::from_secs(15),
                token: Some(SecretString::from("eyJhbGciOiJIUzI1NiJ9.super-secret")),
            },
            search: SearchConfig::default(),
            payments: PaymentConfig::default(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    #[test]
    fn test_socket_addr() {
        let addr = test_config().socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_is_https() {
        let mut config = test_config();
        assert!(!config.is_https());
        config.base_url = "https://aurelle.in".to_string();
        assert!(config.is_https());
    }

    #[test]
    fn test_api_config_debug_redacts_token() {
        let debug_output = format!("{:?}", test_config().api);
        assert!(debug_output.contains("localhost:5000"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super-secret"));
    }

    #[test]
    fn test_search_defaults() {
        let search = SearchConfig::default();
        assert_eq!(search.debounce, Duration::from_millis(300));
        assert_eq!(search.suggestion_limit, 8);
    }

    #[test]
    fn test_parse_value_reports_variable_name() {
        let err = parse_value::<u16>("STOREFRONT_PORT", "eighty").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "STOREFRONT_PORT"));
        assert_eq!(parse_value::<u16>("STOREFRONT_PORT", " 8080 ").unwrap(), 8080);
    }
}
