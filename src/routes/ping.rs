//! The ping relay endpoint.
//!
//! Fetches the configured target and echoes its body behind the configuration
//! label: `"<label> -> <body>"`. Every call resolves settings and performs a
//! fresh outbound request; nothing is cached between calls.

use axum::extract::State;
use tracing::instrument;

use crate::error::AppError;
use crate::state::AppState;

/// Ping handler.
#[instrument(name = "ping::ping", skip(state))]
pub async fn ping(State(state): State<AppState>) -> Result<String, AppError> {
    let settings = state.settings.resolve()?;

    tracing::debug!(target_url = %settings.target_url, "Fetching ping target");
    let body = state.fetcher.fetch(&settings.target_url).await?;

    Ok(format_response(settings.label(), &body))
}

/// Join label and fetched body.
pub fn format_response(label: &str, body: &str) -> String {
    format!("{} -> {}", label, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use reqwest::Url;

    use crate::config::{ConfigError, PingConfig};
    use crate::settings::{Lookup, PingSettings, SettingsSource};
    use crate::upstream::{FetchError, Fetcher};

    /// Returns a canned result and counts calls.
    struct FakeFetcher {
        body: Result<String, fn() -> FetchError>,
        calls: AtomicUsize,
        last_url: Mutex<Option<Url>>,
    }

    impl FakeFetcher {
        fn ok(body: &str) -> Arc<Self> {
            Arc::new(Self {
                body: Ok(body.to_string()),
                calls: AtomicUsize::new(0),
                last_url: Mutex::new(None),
            })
        }

        fn failing(err: fn() -> FetchError) -> Arc<Self> {
            Arc::new(Self {
                body: Err(err),
                calls: AtomicUsize::new(0),
                last_url: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl Fetcher for FakeFetcher {
        async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_url.lock().unwrap() = Some(url.clone());
            match &self.body {
                Ok(body) => Ok(body.clone()),
                Err(make) => Err(make()),
            }
        }
    }

    fn state(label: Option<&str>, fetcher: Arc<FakeFetcher>) -> AppState {
        let settings =
            PingSettings::new("http://example.test/ok", label.map(str::to_string)).unwrap();
        AppState::new(SettingsSource::from(settings), fetcher)
    }

    #[test]
    fn test_format_response() {
        assert_eq!(format_response("prod", "hello"), "prod -> hello");
        assert_eq!(format_response("", "pong"), " -> pong");
        assert_eq!(format_response("prod", ""), "prod -> ");
    }

    #[tokio::test]
    async fn test_ping_joins_label_and_body() {
        let fetcher = FakeFetcher::ok("hello");
        let body = ping(State(state(Some("prod"), fetcher.clone()))).await.unwrap();

        assert_eq!(body, "prod -> hello");
        assert_eq!(
            fetcher.last_url.lock().unwrap().as_ref().map(Url::as_str),
            Some("http://example.test/ok")
        );
    }

    #[tokio::test]
    async fn test_ping_without_label() {
        let body = ping(State(state(None, FakeFetcher::ok("pong")))).await.unwrap();
        assert_eq!(body, " -> pong");
    }

    #[tokio::test]
    async fn test_ping_fetches_on_every_call() {
        let fetcher = FakeFetcher::ok("hello");
        let state = state(Some("prod"), fetcher.clone());

        let first = ping(State(state.clone())).await.unwrap();
        let second = ping(State(state)).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_ping_propagates_fetch_failure() {
        let err = ping(State(state(Some("prod"), FakeFetcher::failing(|| FetchError::Timeout))))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Upstream(FetchError::Timeout)));
    }

    fn live_state(
        vars: &Arc<Mutex<HashMap<String, String>>>,
        fetcher: Arc<FakeFetcher>,
    ) -> AppState {
        let reader = Arc::clone(vars);
        let lookup: Lookup = Arc::new(move |key: &str| reader.lock().unwrap().get(key).cloned());
        let config = PingConfig {
            reload_per_request: true,
            ..PingConfig::default()
        };
        let settings = SettingsSource::from_config_with(&config, lookup).unwrap();
        AppState::new(settings, fetcher)
    }

    #[tokio::test]
    async fn test_live_source_with_missing_url_never_fetches() {
        let fetcher = FakeFetcher::ok("hello");
        let vars = Arc::new(Mutex::new(HashMap::new()));
        let state = live_state(&vars, fetcher.clone());

        let err = ping(State(state)).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Config(ConfigError::InvalidConfiguration(_))
        ));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_live_source_picks_up_changes_between_calls() {
        let fetcher = FakeFetcher::ok("hello");
        let vars = Arc::new(Mutex::new(HashMap::from([
            ("URL_TO_PING".to_string(), "http://first.test/".to_string()),
            ("CONFIGURATION".to_string(), "blue".to_string()),
        ])));
        let state = live_state(&vars, fetcher.clone());

        let first = ping(State(state.clone())).await.unwrap();
        assert_eq!(first, "blue -> hello");

        {
            let mut vars = vars.lock().unwrap();
            vars.insert("URL_TO_PING".to_string(), "http://second.test/".to_string());
            vars.insert("CONFIGURATION".to_string(), "green".to_string());
        }

        let second = ping(State(state)).await.unwrap();
        assert_eq!(second, "green -> hello");
        assert_eq!(
            fetcher.last_url.lock().unwrap().as_ref().map(Url::as_str),
            Some("http://second.test/")
        );
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
    }
}
