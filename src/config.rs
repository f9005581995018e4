//! Application configuration loaded from environment variables.
//!
//! # Configuration Hierarchy
//!
//! All configuration is loaded from environment variables with defaults that
//! point at the public JSON placeholder API. A `.env` file is honoured when
//! present.
//!
//! # Routing
//!
//! - `LOCALES`: Comma-separated list of supported locale codes (default: `en,zh`)
//! - `DEFAULT_LOCALE`: Locale prepended by the locale redirect (default: `en`)
//!
//! # Caching
//!
//! - `PAGE_REVALIDATE_SECS`: `s-maxage` advertised by rendered pages (default: 60)
//!
//! # Upstream
//!
//! - `UPSTREAM_BASE_URL`: Base URL of the JSON API (default: jsonplaceholder)
//! - `UPSTREAM_TIMEOUT_MS`: Per-request timeout for upstream fetches (default: 10000)

use std::env;
use std::time::Duration;

use crate::error::{AppError, AppResult};

/// Default upstream serving the posts and users fixtures.
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human readable, one line per event
    Text,
    /// One JSON object per event
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}' (expected text or json)")),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Application configuration loaded from environment variables.
///
/// # Example
///
/// ```rust,ignore
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.server_addr());
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Server host address (default: "0.0.0.0")
    pub host: String,

    /// Server port (default: 3000)
    pub port: u16,

    /// Maximum request body size in bytes (default: 1MB)
    pub max_request_body_size: usize,

    /// Allowed CORS origins, `*` for any
    pub cors_allowed_origins: Vec<String>,

    // =========================================================================
    // Upstream Configuration
    // =========================================================================
    /// Base URL of the JSON placeholder API, without trailing slash
    pub upstream_base_url: String,

    /// Timeout for a single upstream fetch
    pub upstream_timeout: Duration,

    // =========================================================================
    // Routing Configuration
    // =========================================================================
    /// Supported locale codes, in display order
    pub locales: Vec<String>,

    /// Locale used by the locale redirect
    pub default_locale: String,

    // =========================================================================
    // Caching Configuration
    // =========================================================================
    /// Revalidation window advertised by rendered pages
    pub page_revalidate: Duration,

    // =========================================================================
    // Observability Configuration
    // =========================================================================
    /// Log level (e.g., "info", "debug", "trace")
    pub log_level: String,

    /// Tracing output format
    pub log_format: LogFormat,

    /// Port for Prometheus metrics endpoint (0 = disabled)
    pub metrics_port: u16,
}

impl Config {
    /// Load configuration from environment variables with defaults.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ConfigError` if any value fails to parse or the
    /// resulting configuration is inconsistent.
    pub fn from_env() -> AppResult<Self> {
        // Load an .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let config = Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: Self::parse_env("PORT", 3000)?,
            max_request_body_size: Self::parse_env("MAX_REQUEST_BODY_SIZE", 1024 * 1024)?,
            cors_allowed_origins: Self::parse_list("CORS_ALLOWED_ORIGINS", "*"),

            upstream_base_url: env::var("UPSTREAM_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_UPSTREAM_BASE_URL.to_string()),
            upstream_timeout: Duration::from_millis(Self::parse_env("UPSTREAM_TIMEOUT_MS", 10_000)?),

            locales: Self::parse_list("LOCALES", "en,zh"),
            default_locale: env::var("DEFAULT_LOCALE").unwrap_or_else(|_| "en".to_string()),

            page_revalidate: Duration::from_secs(Self::parse_env("PAGE_REVALIDATE_SECS", 60)?),

            log_level: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            log_format: Self::parse_env("LOG_FORMAT", LogFormat::Text)?,
            metrics_port: Self::parse_env("METRICS_PORT", 0)?,
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values for consistency.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ConfigError` if validation fails.
    pub fn validate(&self) -> AppResult<()> {
        if self.locales.is_empty() {
            return Err(AppError::ConfigError(
                "LOCALES must list at least one locale".to_string(),
            ));
        }

        if !self.locales.contains(&self.default_locale) {
            return Err(AppError::ConfigError(format!(
                "DEFAULT_LOCALE '{}' is not one of LOCALES ({})",
                self.default_locale,
                self.locales.join(",")
            )));
        }

        if !(self.upstream_base_url.starts_with("http://")
            || self.upstream_base_url.starts_with("https://"))
        {
            return Err(AppError::ConfigError(format!(
                "UPSTREAM_BASE_URL must be an http(s) URL, got '{}'",
                self.upstream_base_url
            )));
        }

        if self.upstream_timeout.is_zero() {
            return Err(AppError::ConfigError(
                "UPSTREAM_TIMEOUT_MS must be greater than 0".to_string(),
            ));
        }

        if self.max_request_body_size == 0 {
            return Err(AppError::ConfigError(
                "MAX_REQUEST_BODY_SIZE must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Get the full server address for binding.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if Prometheus metrics export is enabled.
    pub fn metrics_enabled(&self) -> bool {
        self.metrics_port > 0
    }

    /// Get the metrics endpoint address, `None` when disabled.
    pub fn metrics_addr(&self) -> Option<std::net::SocketAddr> {
        self.metrics_enabled()
            .then(|| std::net::SocketAddr::from(([0, 0, 0, 0], self.metrics_port)))
    }

    /// Parse an environment variable into the specified type with a default value.
    fn parse_env<T>(name: &str, default: T) -> AppResult<T>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match env::var(name) {
            Ok(val) => val
                .parse()
                .map_err(|e| AppError::ConfigError(format!("Invalid {name}: {e}"))),
            Err(_) => Ok(default),
        }
    }

    /// Parse a comma-separated list, dropping blank entries.
    fn parse_list(name: &str, default: &str) -> Vec<String> {
        env::var(name)
            .unwrap_or_else(|_| default.to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Default configuration for testing and development.
///
/// Deployments should use `Config::from_env()` instead.
impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            max_request_body_size: 1024 * 1024,
            cors_allowed_origins: vec!["*".to_string()],
            upstream_base_url: DEFAULT_UPSTREAM_BASE_URL.to_string(),
            upstream_timeout: Duration::from_secs(10),
            locales: vec!["en".to_string(), "zh".to_string()],
            default_locale: "en".to_string(),
            page_revalidate: Duration::from_secs(60),
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            metrics_port: 0,
        }
    }
}
