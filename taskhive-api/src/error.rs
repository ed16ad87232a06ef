/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers return `Result<T, ApiError>` which automatically converts
/// to the appropriate HTTP status code.
///
/// The mapping from the core taxonomy is fixed: `NotFound` stays a 404
/// whether the row is missing or access was denied, `Forbidden` becomes
/// 403, `Conflict` 409, `Validation` 422, and store failures a generic 500
/// whose details are logged but never sent to the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use taskhive_core::error::Error as CoreError;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad request (400)
    #[error("{0}")]
    BadRequest(String),

    /// Unauthorized (401)
    #[error("{0}")]
    Unauthorized(String),

    /// Forbidden (403)
    #[error("{0}")]
    Forbidden(String),

    /// Not found (404)
    #[error("{0}")]
    NotFound(String),

    /// Conflict (409) - e.g., duplicate title
    #[error("{0}")]
    Conflict(String),

    /// Unprocessable entity (422) - validation errors
    #[error("{0}")]
    Validation(String),

    /// Internal server error (500)
    #[error("{0}")]
    Internal(String),
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "not_found", "conflict")
    pub error: String,

    /// Human-readable error message
    pub message: String,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::NotFound(_) => "not_found",
            ApiError::Conflict(_) => "conflict",
            ApiError::Validation(_) => "validation",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            // Log internal errors but don't expose details to clients
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(ErrorResponse {
            error: self.code().to_string(),
            message,
        });

        (self.status(), body).into_response()
    }
}

/// Converts core service errors into API errors.
///
/// `Audit` only surfaces when the recorder is driven directly; the services
/// downgrade post-commit audit failures to a reconciliation log instead of
/// failing the caller.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound(_) => ApiError::NotFound(err.to_string()),
            CoreError::Forbidden(msg) => ApiError::Forbidden(msg),
            CoreError::Conflict(msg) => ApiError::Conflict(msg),
            CoreError::Validation(msg) => ApiError::Validation(msg),
            CoreError::Store(e) => ApiError::Internal(format!("database error: {e}")),
            CoreError::Audit(e) => ApiError::Internal(format!("audit append failed: {e}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskhive_core::models::activity::EntityKind;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Invalid input");

        let err = ApiError::NotFound("Project not found".to_string());
        assert_eq!(err.to_string(), "Project not found");
    }

    #[test]
    fn test_core_error_mapping() {
        let err: ApiError = CoreError::NotFound(EntityKind::Project).into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Project not found");

        let err: ApiError = CoreError::Forbidden("no".to_string()).into();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);

        let err: ApiError = CoreError::Conflict("dup".to_string()).into();
        assert_eq!(err.status(), StatusCode::CONFLICT);

        let err: ApiError = CoreError::Validation("bad".to_string()).into();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let err: ApiError = CoreError::Store(sqlx::Error::PoolClosed).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(ApiError::Unauthorized("x".into()).code(), "unauthorized");
        assert_eq!(ApiError::NotFound("x".into()).code(), "not_found");
        assert_eq!(ApiError::Conflict("x".into()).code(), "conflict");
        assert_eq!(ApiError::Validation("x".into()).code(), "validation");
    }
}
