use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::config::ConfigError;
use crate::upstream::FetchError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Upstream(#[from] FetchError),
}

impl AppError {
    /// Status code and client-facing message. Upstream details stay in the logs.
    pub fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Upstream(FetchError::Timeout) => {
                (StatusCode::GATEWAY_TIMEOUT, "Upstream timed out")
            }
            AppError::Upstream(_) => (StatusCode::BAD_GATEWAY, "Upstream unavailable"),
            AppError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        match &self {
            AppError::Upstream(e) => tracing::warn!(error = %e, "Ping target fetch failed"),
            AppError::Config(e) => tracing::error!(error = %e, "Ping target misconfigured"),
        }

        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_maps_to_gateway_timeout() {
        let err = AppError::from(FetchError::Timeout);
        assert_eq!(err.status_and_message().0, StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn test_upstream_failures_map_to_bad_gateway() {
        for err in [
            FetchError::Connect("connection refused".to_string()),
            FetchError::Status(StatusCode::NOT_FOUND),
            FetchError::Other("body decode".to_string()),
        ] {
            let err = AppError::from(err);
            assert_eq!(err.status_and_message().0, StatusCode::BAD_GATEWAY);
        }
    }

    #[test]
    fn test_invalid_configuration_maps_to_internal_error() {
        let err = AppError::from(ConfigError::InvalidConfiguration("URL_TO_PING is not set".into()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
