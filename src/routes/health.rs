//! Liveness probe.
//!
//! Returns 200 as long as the process can answer HTTP. The ping target is not
//! contacted.

pub async fn health() -> &'static str {
    "ok"
}
