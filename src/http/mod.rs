//! HTTP server module.
//!
//! Binds the configured address, serves the router, and drains connections
//! gracefully on SIGTERM/SIGINT.

mod server;
mod shutdown;

pub use server::{listen_addr, start_server, ServerError};
