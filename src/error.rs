//! Application-wide error taxonomy and its HTTP mapping.
//!
//! Every component failure funnels into [`AppError`] at the orchestrator
//! boundary. The mapping to a status code lives here so handlers never
//! hand-pick codes: malformed input is always 4xx, upstream failure 5xx.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::azure::client::AzureError;
use crate::azure::url::ParseError;
use crate::llm::ProviderError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("logger error: {0}")]
    Logger(String),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Azure(#[from] AzureError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("server error: {0}")]
    Server(String),
}

impl AppError {
    /// HTTP status for this error when surfaced through the API.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Parse(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Provider(ProviderError::UnknownProvider(_)) => StatusCode::BAD_REQUEST,
            AppError::Provider(_) => StatusCode::BAD_GATEWAY,
            AppError::Azure(e) => match e {
                // Pass the upstream auth code through (401 vs 403).
                AzureError::Auth(code) => {
                    StatusCode::from_u16(*code).unwrap_or(StatusCode::UNAUTHORIZED)
                }
                AzureError::NotFound(_) => StatusCode::NOT_FOUND,
                AzureError::Transient(_) | AzureError::Api(_) => StatusCode::BAD_GATEWAY,
            },
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_errors_are_bad_request() {
        let e = AppError::Parse(ParseError::MissingBuildId);
        assert_eq!(e.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unknown_provider_is_bad_request() {
        let e = AppError::Provider(ProviderError::UnknownProvider("nope".into()));
        assert_eq!(e.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn provider_request_failure_is_bad_gateway() {
        let e = AppError::Provider(ProviderError::Request("HTTP 500: boom".into()));
        assert_eq!(e.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn azure_auth_code_passes_through() {
        assert_eq!(
            AppError::Azure(AzureError::Auth(401)).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Azure(AzureError::Auth(403)).status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn azure_not_found_maps_to_404() {
        let e = AppError::Azure(AzureError::NotFound("build 42".into()));
        assert_eq!(e.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn validation_message_is_preserved() {
        let e = AppError::Validation("url is required".into());
        assert!(e.to_string().contains("url is required"));
    }
}
