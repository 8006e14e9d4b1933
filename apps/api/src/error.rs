mod types;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;
use warden_core::AppError;

pub use types::ErrorResponse;

/// HTTP API error wrapper around core application errors.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            AppError::Validation(message) => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            AppError::Conflict(message) => (StatusCode::CONFLICT, message),
            AppError::Unauthorized(message) => (StatusCode::UNAUTHORIZED, message),
            AppError::Forbidden(message) => (StatusCode::FORBIDDEN, message),
            AppError::Internal(detail) => {
                error!(detail = %detail, "request failed with internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred".to_owned(),
                )
            }
        };

        error_response(status, status_title(status), message)
    }
}

/// Builds the JSON error payload for a status with an explicit title.
pub fn error_response(
    status: StatusCode,
    error: impl Into<String>,
    message: impl Into<String>,
) -> Response {
    let payload = Json(ErrorResponse::new(status.as_u16(), error, message));
    (status, payload).into_response()
}

fn status_title(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("Error")
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;
