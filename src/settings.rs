//! Ping target settings and where they come from.
//!
//! `PingSettings` is the validated pair of target URL and label used by one ping.
//! `SettingsSource` decides whether that pair is fixed at startup or re-read
//! from the process environment on every request.

use std::fmt;
use std::sync::Arc;

use reqwest::Url;

use crate::config::{ConfigError, PingConfig, CONFIGURATION_VAR, URL_TO_PING_VAR};

/// Validated target URL and configuration label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PingSettings {
    pub target_url: Url,
    pub label: Option<String>,
}

impl PingSettings {
    /// Build settings from a raw URL and an optional label.
    pub fn new(target_url: &str, label: Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            target_url: parse_target_url(target_url)?,
            label,
        })
    }

    /// Build settings from a key lookup, falling back to the `[ping]` config section.
    pub fn from_lookup<F>(lookup: F, fallback: &PingConfig) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup(URL_TO_PING_VAR)
            .or_else(|| fallback.url.clone())
            .ok_or_else(|| {
                ConfigError::InvalidConfiguration(format!("{} is not set", URL_TO_PING_VAR))
            })?;
        let label = lookup(CONFIGURATION_VAR).or_else(|| fallback.label.clone());

        Self::new(&url, label)
    }

    /// The label as rendered in responses; absent labels render empty.
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or_default()
    }
}

/// Parse and check a ping target. Only absolute http(s) URLs are accepted.
pub fn parse_target_url(raw: &str) -> Result<Url, ConfigError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ConfigError::InvalidConfiguration(format!(
            "{} is empty",
            URL_TO_PING_VAR
        )));
    }

    let url = Url::parse(raw).map_err(|e| {
        ConfigError::InvalidConfiguration(format!("{} is not a valid URL: {}", URL_TO_PING_VAR, e))
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ConfigError::InvalidConfiguration(format!(
            "{} has unsupported scheme '{}'",
            URL_TO_PING_VAR, scheme
        ))),
    }
}

/// Key lookup for `URL_TO_PING` and `CONFIGURATION`.
pub type Lookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Lookup backed by the process environment.
pub fn env_lookup() -> Lookup {
    Arc::new(|key: &str| std::env::var(key).ok())
}

/// Settings re-read through a lookup on every request.
#[derive(Clone)]
pub struct LiveSettings {
    lookup: Lookup,
    fallback: PingConfig,
}

impl LiveSettings {
    pub fn new(lookup: Lookup, fallback: PingConfig) -> Self {
        Self { lookup, fallback }
    }

    pub fn resolve(&self) -> Result<PingSettings, ConfigError> {
        PingSettings::from_lookup(|key: &str| (self.lookup)(key), &self.fallback)
    }
}

impl fmt::Debug for LiveSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveSettings")
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}

/// Where each request gets its `PingSettings`.
#[derive(Debug, Clone)]
pub enum SettingsSource {
    /// Resolved and validated once at startup
    Static(Arc<PingSettings>),
    /// Re-read on every request
    Live(Arc<LiveSettings>),
}

impl SettingsSource {
    /// Build the source selected by `ping.reload_per_request`, reading the process environment.
    pub fn from_config(config: &PingConfig) -> Result<Self, ConfigError> {
        Self::from_config_with(config, env_lookup())
    }

    /// Build the source selected by `ping.reload_per_request` over `lookup`.
    ///
    /// The static source validates immediately so a bad target fails startup.
    pub fn from_config_with(config: &PingConfig, lookup: Lookup) -> Result<Self, ConfigError> {
        if config.reload_per_request {
            let live = LiveSettings::new(lookup, config.clone());
            if let Err(e) = live.resolve() {
                tracing::warn!(error = %e, "Ping target currently invalid; requests will fail until it is fixed");
            }
            return Ok(Self::Live(Arc::new(live)));
        }

        let settings = PingSettings::from_lookup(|key: &str| lookup(key), config)?;
        Ok(Self::Static(Arc::new(settings)))
    }

    /// Settings for the current request.
    pub fn resolve(&self) -> Result<Arc<PingSettings>, ConfigError> {
        match self {
            Self::Static(settings) => Ok(Arc::clone(settings)),
            Self::Live(live) => live.resolve().map(Arc::new),
        }
    }
}

impl From<PingSettings> for SettingsSource {
    fn from(settings: PingSettings) -> Self {
        Self::Static(Arc::new(settings))
    }
}
