use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::error::AppError;
use crate::services::Principal;
use crate::state::AppState;
use crate::utils::jwt;

/// Authenticated user extracted from the `Authorization: Bearer <token>` header.
///
/// Add this as a handler parameter to require authentication, or
/// `Option<AuthUser>` for routes that anonymous callers may also use.
pub struct AuthUser {
    pub user_id: i32,
    pub username: String,
}

impl AuthUser {
    pub fn principal(&self) -> Principal {
        Principal::new(self.user_id)
    }
}

fn decode_header(value: &str, secret: &str) -> Result<AuthUser, AppError> {
    let token = value
        .strip_prefix("Bearer ")
        .ok_or(AppError::TokenInvalid)?;
    let claims = jwt::verify(token, secret).map_err(|_| AppError::TokenInvalid)?;
    Ok(AuthUser {
        user_id: claims.uid,
        username: claims.sub,
    })
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::TokenMissing)?;

        decode_header(auth_header, &state.config.auth.jwt_secret)
    }
}

/// A missing header means anonymous. A header that is present but bad is
/// still rejected, so clients learn their token has expired.
impl OptionalFromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        let Some(header) = parts.headers.get(AUTHORIZATION) else {
            return Ok(None);
        };
        let header = header.to_str().map_err(|_| AppError::TokenInvalid)?;
        decode_header(header, &state.config.auth.jwt_secret).map(Some)
    }
}
