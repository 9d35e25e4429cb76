//! Error types for the testbed host.
//!
//! Uses `thiserror` for structured error handling with automatic `From`
//! implementations. All errors are terminal for the current request: they
//! map straight onto an HTTP response with no retry or recovery.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors from the provider token exchange.
#[derive(thiserror::Error, Debug)]
pub enum ExchangeError {
    /// HTTP transport error (connection, DNS, TLS, timeout).
    #[error("Token exchange failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered with a non-200 status. The raw response body is
    /// surfaced to the caller for debuggability.
    #[error("Token exchange failed: {body}")]
    Upstream {
        /// HTTP status returned by the provider.
        status: u16,
        /// Raw provider response body.
        body: String,
    },

    /// Provider answered 200 with a body that is not valid JSON.
    #[error("Failed to parse token response: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ExchangeError {
    /// Create an upstream error from a provider status and body.
    #[must_use]
    pub fn upstream(status: u16, body: impl Into<String>) -> Self {
        Self::Upstream { status, body: body.into() }
    }
}

/// Errors surfaced on the HTTP API.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    /// The callback was hit without a `code` query parameter.
    #[error("Missing code")]
    MissingCode,

    /// The exchange with the provider failed.
    #[error(transparent)]
    Exchange(#[from] ExchangeError),

    /// The session carries no access token.
    #[error("Not authenticated")]
    NotAuthenticated,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::MissingCode => (StatusCode::BAD_REQUEST, "Missing code").into_response(),
            Self::Exchange(e) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
            Self::NotAuthenticated => (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({ "error": "Not authenticated" })),
            )
                .into_response(),
        }
    }
}

/// Result type alias for exchange operations.
pub type ExchangeResult<T> = Result<T, ExchangeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_error_surfaces_body() {
        let err = ExchangeError::upstream(403, r#"{"developerMessage":"invalid client"}"#);
        let msg = err.to_string();
        assert!(msg.starts_with("Token exchange failed:"));
        assert!(msg.contains("invalid client"));
    }

    #[test]
    fn test_api_error_statuses() {
        assert_eq!(ApiError::MissingCode.into_response().status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Exchange(ExchangeError::upstream(500, "boom")).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotAuthenticated.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
