//! ping-relay: fetch a configured URL and echo it behind a deployment label.
//!
//! `GET /api/ping` reads the target URL and label (`URL_TO_PING`,
//! `CONFIGURATION`), fetches the target, and answers `"<label> -> <body>"`.

pub mod config;
pub mod error;
pub mod http;
pub mod middleware;
pub mod routes;
pub mod settings;
pub mod state;
pub mod upstream;

pub use error::AppError;
pub use routes::create_router;
pub use settings::{PingSettings, SettingsSource};
pub use state::AppState;
pub use upstream::{FetchError, Fetcher, HttpFetcher};
