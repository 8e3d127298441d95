//! Dashboard configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `API_BASE_URL` - Base URL of the Jatim Bissa REST backend
//!
//! ## Optional
//! - `API_TIMEOUT_SECS` - Per-request timeout for backend calls (default: 15)
//! - `DASHBOARD_HOST` - Bind address (default: 127.0.0.1)
//! - `DASHBOARD_PORT` - Listen port (default: 3000)
//! - `DASHBOARD_BASE_URL` - Public URL of the dashboard (default: `http://localhost:3000`).
//!   An `https://` URL marks session cookies `Secure`.
//! - `SESSION_TTL_HOURS` - Session cookie lifetime (default: 24)
//! - `LOG_FORMAT` - `json` for structured logs, anything else for text
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` / `SENTRY_TRACES_SAMPLE_RATE` - 0.0 to 1.0 (default: 1.0)

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_API_TIMEOUT_SECS: u64 = 15;
const DEFAULT_SESSION_TTL_HOURS: i64 = 24;
const MAX_SESSION_TTL_HOURS: i64 = 24 * 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Dashboard application configuration.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the dashboard
    pub base_url: String,
    /// REST backend settings
    pub api: ApiConfig,
    /// Session cookie lifetime in hours
    pub session_ttl_hours: i64,
    /// Emit JSON logs instead of text
    pub json_logs: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// REST backend configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL; resource paths are appended to it.
    pub base_url: Url,
    /// Timeout applied to every backend request.
    pub timeout: Duration,
}

impl ApiConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let raw = get_required_env("API_BASE_URL")?;
        let base_url = parse_base_url(&raw)
            .map_err(|e| ConfigError::InvalidEnvVar("API_BASE_URL".to_string(), e))?;

        let timeout_secs = get_env_or_default("API_TIMEOUT_SECS", "15")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("API_TIMEOUT_SECS".to_string(), e.to_string())
            })?;
        let timeout_secs = if timeout_secs == 0 {
            DEFAULT_API_TIMEOUT_SECS
        } else {
            timeout_secs
        };

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl DashboardConfig {
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

        let host = get_env_or_default("DASHBOARD_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("DASHBOARD_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("DASHBOARD_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("DASHBOARD_PORT".to_string(), e.to_string()))?;
        let base_url = get_env_or_default("DASHBOARD_BASE_URL", "http://localhost:3000");
        let session_ttl_hours = parse_session_ttl(&get_env_or_default(
            "SESSION_TTL_HOURS",
            &DEFAULT_SESSION_TTL_HOURS.to_string(),
        ))?;

        let api = ApiConfig::from_env()?;
        let json_logs = get_optional_env("LOG_FORMAT").is_some_and(|f| f.eq_ignore_ascii_case("json"));
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            host,
            port,
            base_url,
            api,
            session_ttl_hours,
            json_logs,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Configuration pointing at `api_base_url`, with every other value at
    /// its default. Used by tests and tools that do not read the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the URL cannot be parsed.
    pub fn for_api(api_base_url: &str) -> Result<Self, ConfigError> {
        let base_url = parse_base_url(api_base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("API_BASE_URL".to_string(), e))?;

        Ok(Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            api: ApiConfig {
                base_url,
                timeout: Duration::from_secs(DEFAULT_API_TIMEOUT_SECS),
            },
            session_ttl_hours: DEFAULT_SESSION_TTL_HOURS,
            json_logs: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether session cookies must carry the `Secure` attribute.
    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        self.base_url.starts_with("https://")
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
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse the backend base URL, normalizing it to end with `/` so that
/// `Url::join` appends resource paths instead of replacing the last segment.
fn parse_base_url(raw: &str) -> Result<Url, String> {
    let mut url = Url::parse(raw.trim()).map_err(|e| e.to_string())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme {:?}", url.scheme()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn parse_session_ttl(raw: &str) -> Result<i64, ConfigError> {
    let hours = raw.parse::<i64>().map_err(|e| {
        ConfigError::InvalidEnvVar("SESSION_TTL_HOURS".to_string(), e.to_string())
    })?;
    if !(1..=MAX_SESSION_TTL_HOURS).contains(&hours) {
        return Err(ConfigError::InvalidEnvVar(
            "SESSION_TTL_HOURS".to_string(),
            format!("must be between 1 and {MAX_SESSION_TTL_HOURS} (got {hours})"),
        ));
    }
    Ok(hours)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base_url_appends_slash() {
        let url = parse_base_url("https://api.jatimbissa.id/api/v1").unwrap();
        assert_eq!(url.as_str(), "https://api.jatimbissa.id/api/v1/");
        assert_eq!(
            url.join("companies").unwrap().as_str(),
            "https://api.jatimbissa.id/api/v1/companies"
        );
    }

    #[test]
    fn test_parse_base_url_keeps_existing_slash() {
        let url = parse_base_url("http://127.0.0.1:8000/").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8000/");
    }

    #[test]
    fn test_parse_base_url_rejects_other_schemes() {
        assert!(parse_base_url("ftp://example.com").is_err());
        assert!(parse_base_url("not a url").is_err());
    }

    #[test]
    fn test_session_ttl_bounds() {
        assert_eq!(parse_session_ttl("24").unwrap(), 24);
        assert!(parse_session_ttl("0").is_err());
        assert!(parse_session_ttl("100000").is_err());
        assert!(parse_session_ttl("soon").is_err());
    }

    #[test]
    fn test_for_api_defaults() {
        let config = DashboardConfig::for_api("http://localhost:8000/api").unwrap();
        assert_eq!(config.api.base_url.as_str(), "http://localhost:8000/api/");
        assert_eq!(config.socket_addr().port(), 3000);
        assert_eq!(config.session_ttl_hours, 24);
        assert!(!config.secure_cookies());
    }

    #[test]
    fn test_secure_cookies_follow_base_url() {
        let mut config = DashboardConfig::for_api("http://localhost:8000").unwrap();
        config.base_url = "https://admin.jatimbissa.id".to_string();
        assert!(config.secure_cookies());
    }
}
