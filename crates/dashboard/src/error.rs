//! REST error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dashboard_lib::{CollectError, RuntimeError};
use serde_json::json;
use thiserror::Error;

/// Errors returned by the REST facade as `{"error": "..."}`
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    RuntimeUnavailable(String),

    #[error("{0}")]
    Engine(String),

    #[error("{0}")]
    Timeout(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::RuntimeUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Engine(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl From<RuntimeError> for ApiError {
    fn from(err: RuntimeError) -> Self {
        match err {
            RuntimeError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            RuntimeError::Connection(_) => ApiError::RuntimeUnavailable(
                "Docker is not running or cannot be reached".to_string(),
            ),
            RuntimeError::Engine { .. } => ApiError::Engine(err.to_string()),
        }
    }
}

impl From<CollectError> for ApiError {
    fn from(err: CollectError) -> Self {
        ApiError::RuntimeUnavailable(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_errors_map_to_status() {
        let not_found: ApiError = RuntimeError::NotFound {
            kind: "container",
            id: "abc".to_string(),
        }
        .into();
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.to_string(), "container not found: abc");

        let down: ApiError = RuntimeError::Connection("socket missing".to_string()).into();
        assert_eq!(down.status_code(), StatusCode::SERVICE_UNAVAILABLE);

        let engine: ApiError = RuntimeError::Engine {
            status: 409,
            message: "conflict".to_string(),
        }
        .into();
        assert_eq!(engine.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_collect_error_is_unavailable() {
        let err: ApiError = CollectError::RuntimeUnavailable("ping failed".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(err.to_string().contains("ping failed"));
    }
}
