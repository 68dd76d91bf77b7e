use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{Duration, Utc};
use tracing::{info, instrument, warn};

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::mailer::{self, Email};
use crate::models::auth::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, MessageResponse, RegisterRequest,
    ResetPasswordRequest, UserResponse, normalize_email, validate_login_request,
    validate_password, validate_register_request,
};
use crate::state::AppState;
use crate::store::NewUser;
use crate::utils::{hash, jwt, token};

async fn send_best_effort(state: &AppState, email: Email) {
    let to = email.to.clone();
    if let Err(e) = state.mailer.send(email).await {
        warn!(%to, error = %e, "Failed to send email");
    }
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Auth",
    operation_id = "register",
    summary = "Register a new user",
    description = "Creates an unverified account and emails a verification link.",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 409, description = "Username or email taken (USERNAME_TAKEN, EMAIL_TAKEN)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(username = %payload.username))]
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_register_request(&payload)?;

    let hash = hash::hash_password(&payload.password)
        .map_err(|e| AppError::Internal(format!("Password hash error: {}", e)))?;
    let verification_token = token::generate_token();

    let user = state
        .store
        .create_user(NewUser {
            username: payload.username.trim().to_string(),
            email: normalize_email(&payload.email),
            password: hash,
            full_name: payload.full_name.trim().to_string(),
            is_verified: false,
            verification_token: Some(verification_token.clone()),
        })
        .await?;

    info!(user_id = user.id, "User registered");
    send_best_effort(
        &state,
        mailer::verification_email(
            &state.config.mail.app_url,
            &user.email,
            &user.full_name,
            &verification_token,
        ),
    )
    .await;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Confirm an email address.
#[utoipa::path(
    get,
    path = "/auth/verify-email/{token}",
    tag = "Auth",
    operation_id = "verifyEmail",
    summary = "Verify an email address",
    params(("token" = String, Path, description = "Token from the verification email")),
    responses(
        (status = 200, description = "Email verified", body = MessageResponse),
        (status = 400, description = "Unknown token (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, token))]
pub async fn verify_email(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let user = state
        .store
        .find_user_by_verification_token(&token)
        .await?
        .ok_or_else(|| AppError::Validation("Invalid or expired verification token".into()))?;

    state.store.mark_user_verified(user.id).await?;
    info!(user_id = user.id, "Email verified");

    Ok(Json(MessageResponse::new(
        "Email verified successfully. You can now log in.",
    )))
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    operation_id = "login",
    summary = "Log in",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Invalid credentials (INVALID_CREDENTIALS)", body = ErrorBody),
        (status = 403, description = "Email not verified (EMAIL_NOT_VERIFIED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    validate_login_request(&payload)?;

    let user = state
        .store
        .find_user_by_email(&normalize_email(&payload.email))
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let is_valid = hash::verify_password(&payload.password, &user.password)
        .map_err(|e| AppError::Internal(format!("Password verify error: {}", e)))?;
    if !is_valid {
        return Err(AppError::InvalidCredentials);
    }
    if state.config.auth.require_verified_email && !user.is_verified {
        return Err(AppError::EmailNotVerified);
    }

    let token = jwt::sign(
        user.id,
        &user.username,
        &state.config.auth.jwt_secret,
        state.config.auth.token_ttl_days,
    )
    .map_err(|e| AppError::Internal(format!("JWT sign error: {}", e)))?;

    Ok(Json(LoginResponse {
        token,
        user: user.into(),
    }))
}

/// Return the current authenticated user.
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Auth",
    operation_id = "me",
    summary = "Current user",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn me(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state
        .store
        .get_user(auth_user.user_id)
        .await?
        .ok_or(AppError::TokenInvalid)?;
    Ok(Json(user.into()))
}

/// Start a password reset.
#[utoipa::path(
    post,
    path = "/auth/forgot-password",
    tag = "Auth",
    operation_id = "forgotPassword",
    summary = "Request a password reset email",
    description = "Always succeeds so the response does not reveal which emails are registered.",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Request accepted", body = MessageResponse),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn forgot_password(
    State(state): State<AppState>,
    AppJson(payload): AppJson<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let email = normalize_email(&payload.email);
    if let Some(user) = state.store.find_user_by_email(&email).await? {
        let ttl = state.config.auth.reset_token_ttl_minutes;
        let reset_token = token::generate_token();
        state
            .store
            .set_reset_token(user.id, &reset_token, Utc::now() + Duration::minutes(ttl))
            .await?;
        info!(user_id = user.id, "Password reset requested");
        send_best_effort(
            &state,
            mailer::password_reset_email(
                &state.config.mail.app_url,
                &user.email,
                &user.full_name,
                &reset_token,
                ttl,
            ),
        )
        .await;
    }

    Ok(Json(MessageResponse::new(
        "If an account exists with that email, a password reset link has been sent.",
    )))
}

/// Finish a password reset.
#[utoipa::path(
    post,
    path = "/auth/reset-password",
    tag = "Auth",
    operation_id = "resetPassword",
    summary = "Set a new password with a reset token",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Invalid or expired token, or weak password (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn reset_password(
    State(state): State<AppState>,
    AppJson(payload): AppJson<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    validate_password(&payload.password)?;

    let invalid = || AppError::Validation("Invalid or expired reset token".into());
    let user = state
        .store
        .find_user_by_reset_token(&payload.token)
        .await?
        .ok_or_else(invalid)?;
    if user.reset_token_expiry.is_none_or(|expiry| expiry < Utc::now()) {
        return Err(invalid());
    }

    let hash = hash::hash_password(&payload.password)
        .map_err(|e| AppError::Internal(format!("Password hash error: {}", e)))?;
    state.store.set_password(user.id, &hash).await?;
    info!(user_id = user.id, "Password reset");

    Ok(Json(MessageResponse::new(
        "Password has been reset. You can now log in with your new password.",
    )))
}
