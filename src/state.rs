//! Shared application state for request handlers.

use std::sync::Arc;

use crate::settings::SettingsSource;
use crate::upstream::Fetcher;

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
///
/// Holds no mutable data: the settings source and the outbound fetcher are
/// both read-only once the server starts.
#[derive(Clone)]
pub struct AppState {
    pub settings: SettingsSource,
    pub fetcher: Arc<dyn Fetcher>,
}

impl AppState {
    pub fn new(settings: SettingsSource, fetcher: Arc<dyn Fetcher>) -> Self {
        Self { settings, fetcher }
    }
}
