//! Maps domain `AppError` to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use seatgrid_core::error::{AppError, ErrorKind};

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

/// Local wrapper around [`AppError`] so `IntoResponse` can be implemented
/// in this crate (orphan rule).
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let Self(err) = self;
        let status = match err.kind {
            ErrorKind::InvalidSeatId => StatusCode::NOT_FOUND,
            ErrorKind::SeatUnavailable
            | ErrorKind::NotHolder
            | ErrorKind::InvalidState
            | ErrorKind::NameTaken => StatusCode::CONFLICT,
            ErrorKind::CapacityReached => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::NotLoggedIn => StatusCode::UNAUTHORIZED,
            ErrorKind::Validation | ErrorKind::Serialization => StatusCode::BAD_REQUEST,
            ErrorKind::Configuration | ErrorKind::Internal => {
                tracing::error!(error = %err.message, "internal server error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ApiErrorResponse {
            code: err.code(),
            message: err.message.clone(),
        };

        (status, Json(body)).into_response()
    }
}
