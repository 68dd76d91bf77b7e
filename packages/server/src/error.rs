use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::store::StoreError;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `TOKEN_MISSING`,
    /// `TOKEN_INVALID`, `INVALID_CREDENTIALS`, `EMAIL_NOT_VERIFIED`,
    /// `PERMISSION_DENIED`, `NOT_FOUND`, `CONFLICT`, `INVALID_OPERATION`,
    /// `USERNAME_TAKEN`, `EMAIL_TAKEN`, `INTERNAL_ERROR`.
    #[schema(example = "VALIDATION_ERROR")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "Title must be 1-256 characters")]
    pub message: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    TokenMissing,
    TokenInvalid,
    InvalidCredentials,
    EmailNotVerified,
    PermissionDenied(String),
    NotFound(String),
    /// A state-machine precondition failed, e.g. the proposal was already decided.
    Conflict(String),
    /// The caller picked the wrong path for what they are trying to do.
    InvalidOperation(String),
    UsernameTaken,
    EmailTaken,
    Internal(String),
}

impl AppError {
    /// Stable machine-readable reason code.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::TokenMissing => "TOKEN_MISSING",
            AppError::TokenInvalid => "TOKEN_INVALID",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::EmailNotVerified => "EMAIL_NOT_VERIFIED",
            AppError::PermissionDenied(_) => "PERMISSION_DENIED",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::InvalidOperation(_) => "INVALID_OPERATION",
            AppError::UsernameTaken => "USERNAME_TAKEN",
            AppError::EmailTaken => "EMAIL_TAKEN",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        let code = self.code();
        let (status, message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::TokenMissing => (StatusCode::UNAUTHORIZED, "Authentication required".into()),
            AppError::TokenInvalid => (StatusCode::UNAUTHORIZED, "Invalid or expired token".into()),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "Invalid email or password".into(),
            ),
            AppError::EmailNotVerified => (
                StatusCode::FORBIDDEN,
                "Email address has not been verified".into(),
            ),
            AppError::PermissionDenied(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::InvalidOperation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::UsernameTaken => (StatusCode::CONFLICT, "Username is already taken".into()),
            AppError::EmailTaken => (
                StatusCode::CONFLICT,
                "Email address is already registered".into(),
            ),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred".into(),
                )
            }
        };
        (status, ErrorBody { code, message })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate("username") => AppError::UsernameTaken,
            StoreError::Duplicate("email") => AppError::EmailTaken,
            other => AppError::Internal(other.to_string()),
        }
    }
}
