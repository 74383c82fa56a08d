//! Configuration loading and constants.
//!
//! Loads application configuration from an optional TOML file. Every section has
//! defaults, so the service can start with no file at all and take its ping
//! target from the environment. `AppConfig` is the root configuration struct.

use serde::Deserialize;
use std::path::Path;

// =============================================================================
// Environment Variables
// =============================================================================

/// Environment variable holding the URL fetched on every ping
pub const URL_TO_PING_VAR: &str = "URL_TO_PING";

/// Environment variable holding the label echoed in every ping response
pub const CONFIGURATION_VAR: &str = "CONFIGURATION";

// =============================================================================
// HTTP Response Headers
// =============================================================================

/// Ping responses reflect a live upstream fetch and must never be cached
pub const CACHE_CONTROL_PING: &str = "no-store";

/// Response header carrying the per-request correlation id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

// =============================================================================
// Defaults
// =============================================================================

/// Default log filter when neither --log-level nor RUST_LOG is set
pub const DEFAULT_LOG_FILTER: &str = "ping_relay=debug";

pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Seconds to wait for in-flight requests after a shutdown signal
pub const DEFAULT_SHUTDOWN_GRACE_SECS: u64 = 30;

/// Total time allowed for one outbound fetch, body included
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

/// Time allowed to establish the outbound TCP/TLS connection
pub const DEFAULT_UPSTREAM_CONNECT_TIMEOUT_SECS: u64 = 10;

/// User-Agent sent on outbound fetches
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub http: HttpServerConfig,
    /// Outbound client settings
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// File fallbacks for the ping target and label
    #[serde(default)]
    pub ping: PingConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    #[serde(default = "HttpServerConfig::default_port")]
    pub port: u16,
    #[serde(default = "HttpServerConfig::default_shutdown_grace")]
    pub shutdown_grace_seconds: u64,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            shutdown_grace_seconds: Self::default_shutdown_grace(),
        }
    }
}

impl HttpServerConfig {
    fn default_host() -> String {
        DEFAULT_HTTP_HOST.to_string()
    }

    fn default_port() -> u16 {
        DEFAULT_HTTP_PORT
    }

    fn default_shutdown_grace() -> u64 {
        DEFAULT_SHUTDOWN_GRACE_SECS
    }
}

/// Outbound HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    /// Total request timeout in seconds (default: 30)
    #[serde(default = "UpstreamConfig::default_timeout")]
    pub timeout_seconds: u64,
    /// Connect timeout in seconds (default: 10)
    #[serde(default = "UpstreamConfig::default_connect_timeout")]
    pub connect_timeout_seconds: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: Self::default_timeout(),
            connect_timeout_seconds: Self::default_connect_timeout(),
        }
    }
}

impl UpstreamConfig {
    fn default_timeout() -> u64 {
        DEFAULT_UPSTREAM_TIMEOUT_SECS
    }

    fn default_connect_timeout() -> u64 {
        DEFAULT_UPSTREAM_CONNECT_TIMEOUT_SECS
    }
}

/// Ping target configuration.
///
/// `URL_TO_PING` and `CONFIGURATION` take priority over these values.
///
/// Reading both variables on every request is the original behaviour and is
/// kept by `reload_per_request = true`. The default takes one snapshot at
/// startup, which only differs if the process environment changes while the
/// service runs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PingConfig {
    /// Fallback for `URL_TO_PING`
    pub url: Option<String>,
    /// Fallback for `CONFIGURATION`
    pub label: Option<String>,
    /// Re-read the environment on every request instead of once at startup
    #[serde(default)]
    pub reload_per_request: bool,
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)?;

        if config.upstream.timeout_seconds == 0 {
            return Err(ConfigError::Validation(
                "upstream.timeout_seconds must be greater than zero".to_string(),
            ));
        }
        if config.upstream.connect_timeout_seconds == 0 {
            return Err(ConfigError::Validation(
                "upstream.connect_timeout_seconds must be greater than zero".to_string(),
            ));
        }

        Ok(config)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}
