//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; the defaults target a local development setup
//! with the backend on port 8080.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront (default: <http://localhost:3000>).
//!   An `https://` URL turns on secure session cookies.
//! - `PERFUME_API_URL` - Base URL of the REST backend (default: <http://localhost:8080>)
//! - `PERFUME_API_TIMEOUT_SECS` - Per-request timeout for backend calls (default: 15)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate, 0.0-1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate, 0.0-1.0 (default: 0.0)
//! - `LOG_FORMAT` - `json` for structured log lines, anything else for text

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:8080";
const DEFAULT_API_TIMEOUT_SECS: u64 = 15;

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
    /// REST backend connection settings
    pub backend: BackendConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
    /// Emit logs as JSON lines
    pub log_json: bool,
}

/// REST backend connection settings.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL every API path is appended to
    pub base_url: Url,
    /// Fixed timeout applied to every request
    pub timeout: Duration,
}

impl BackendConfig {
    /// Backend settings for the given base URL with the default timeout.
    #[must_use]
    pub const fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: Duration::from_secs(DEFAULT_API_TIMEOUT_SECS),
        }
    }

    /// Override the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Lookup(&lookup);

        let host = env.parse_or("STOREFRONT_HOST", "127.0.0.1".parse::<IpAddr>().ok())?;
        let port = env.parse_or("STOREFRONT_PORT", Some(3000_u16))?;
        let base_url = env.or_default("STOREFRONT_BASE_URL", "http://localhost:3000");

        let backend = BackendConfig {
            base_url: parse_api_url(&env.or_default("PERFUME_API_URL", DEFAULT_API_URL))?,
            timeout: Duration::from_secs(parse_timeout(&env)?),
        };

        Ok(Self {
            host,
            port,
            base_url,
            backend,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_rate(&env, "SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: parse_rate(&env, "SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
            log_json: env
                .optional("LOG_FORMAT")
                .is_some_and(|format| format.trim().eq_ignore_ascii_case("json")),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the storefront is served over HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Lookup<'a, F>(&'a F);

impl<F: Fn(&str) -> Option<String>> Lookup<'_, F> {
    /// Get an optional variable, treating blank values as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parse_or<T>(&self, key: &str, default: Option<T>) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.optional(key) {
            Some(raw) => raw
                .trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
            None => default.ok_or_else(|| ConfigError::MissingEnvVar(key.to_string())),
        }
    }
}

fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidEnvVar("PERFUME_API_URL".to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "PERFUME_API_URL".to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

fn parse_timeout<F: Fn(&str) -> Option<String>>(env: &Lookup<'_, F>) -> Result<u64, ConfigError> {
    let secs = env.parse_or("PERFUME_API_TIMEOUT_SECS", Some(DEFAULT_API_TIMEOUT_SECS))?;
    if secs == 0 {
        return Err(ConfigError::InvalidEnvVar(
            "PERFUME_API_TIMEOUT_SECS".to_string(),
            "must be greater than zero".to_string(),
        ));
    }
    Ok(secs)
}

fn parse_rate<F: Fn(&str) -> Option<String>>(
    env: &Lookup<'_, F>,
    key: &str,
    default: f32,
) -> Result<f32, ConfigError> {
    let rate = env.parse_or(key, Some(default))?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ));
    }
    Ok(rate)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.backend.base_url.as_str(), "http://localhost:8080/");
        assert_eq!(config.backend.timeout, Duration::from_secs(15));
        assert!(!config.is_secure());
        assert!(config.sentry_dsn.is_none());
        assert!(!config.log_json);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("STOREFRONT_HOST", "0.0.0.0"),
            ("STOREFRONT_PORT", "8000"),
            ("STOREFRONT_BASE_URL", "https://perfumeshop.az"),
            ("PERFUME_API_URL", "https://api.perfumeshop.az/v1"),
            ("PERFUME_API_TIMEOUT_SECS", "5"),
            ("SENTRY_TRACES_SAMPLE_RATE", "0.25"),
            ("LOG_FORMAT", "JSON"),
        ])
        .unwrap();
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8000");
        assert!(config.is_secure());
        assert_eq!(config.backend.base_url.path(), "/v1");
        assert_eq!(config.backend.timeout, Duration::from_secs(5));
        assert!((config.sentry_traces_sample_rate - 0.25).abs() < f32::EPSILON);
        assert!(config.log_json);
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = load(&[("STOREFRONT_PORT", "  "), ("SENTRY_DSN", "")]).unwrap();
        assert_eq!(config.port, 3000);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[("STOREFRONT_PORT", "http")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "STOREFRONT_PORT"));
    }

    #[test]
    fn test_api_url_must_be_http() {
        assert!(load(&[("PERFUME_API_URL", "ftp://backend")]).is_err());
        assert!(load(&[("PERFUME_API_URL", "not a url")]).is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        assert!(load(&[("PERFUME_API_TIMEOUT_SECS", "0")]).is_err());
    }

    #[test]
    fn test_sample_rate_range() {
        assert!(load(&[("SENTRY_SAMPLE_RATE", "1.5")]).is_err());
    }
}
