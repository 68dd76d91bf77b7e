use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::suggestion::{
    CreateSuggestionRequest, PendingEditResponse, ReviewSuggestionRequest, SuggestionResponse,
};
use crate::services::suggestion_service;
use crate::state::AppState;

/// Suggest an edit to someone else's blog.
#[utoipa::path(
    post,
    path = "/suggestions",
    tag = "Suggestions",
    operation_id = "createSuggestion",
    summary = "Suggest an edit",
    description = "Records a pending suggestion and notifies the blog's author. \
        The blog itself is not changed. Authors cannot suggest edits to their own blogs.",
    request_body = CreateSuggestionRequest,
    responses(
        (status = 201, description = "Suggestion created", body = SuggestionResponse),
        (status = 400, description = "Validation error or own blog (VALIDATION_ERROR, INVALID_OPERATION)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Blog not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, blog_id = payload.blog_id))]
pub async fn create_suggestion(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateSuggestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let blog_id = payload.blog_id;
    let proposal = suggestion_service(&state)
        .propose_edit(auth_user.principal(), blog_id, payload.into())
        .await?;
    Ok((StatusCode::CREATED, Json(SuggestionResponse::from(proposal))))
}

/// Read one suggestion.
#[utoipa::path(
    get,
    path = "/suggestions/{id}",
    tag = "Suggestions",
    operation_id = "getSuggestion",
    summary = "Get a suggestion",
    description = "Visible to the proposer and to the blog's author.",
    params(("id" = i32, Path, description = "Suggestion ID")),
    responses(
        (status = 200, description = "Suggestion", body = SuggestionResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn get_suggestion(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<SuggestionResponse>, AppError> {
    let proposal = suggestion_service(&state)
        .get_visible(auth_user.principal(), id)
        .await?;
    Ok(Json(proposal.into()))
}

/// Accept or reject a suggestion.
#[utoipa::path(
    put,
    path = "/suggestions/{id}",
    tag = "Suggestions",
    operation_id = "reviewSuggestion",
    summary = "Accept or reject a suggestion",
    description = "Only the blog's author may decide, and only once. Accepting copies the \
        suggested title, content and excerpt into the blog. The proposer is notified either way.",
    params(("id" = i32, Path, description = "Suggestion ID")),
    request_body = ReviewSuggestionRequest,
    responses(
        (status = 200, description = "Suggestion decided", body = SuggestionResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the blog's author (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Already decided (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, decision = ?payload.status))]
pub async fn review_suggestion(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<ReviewSuggestionRequest>,
) -> Result<Json<SuggestionResponse>, AppError> {
    let (proposal, _blog) = suggestion_service(&state)
        .decide(auth_user.principal(), id, payload.status, payload.comment)
        .await?;
    Ok(Json(proposal.into()))
}

/// Suggestions the caller has made.
#[utoipa::path(
    get,
    path = "/suggestions/mine",
    tag = "Suggestions",
    operation_id = "listMySuggestions",
    summary = "List my suggestions",
    responses(
        (status = 200, description = "Suggestions, newest first", body = Vec<SuggestionResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn list_my_suggestions(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<SuggestionResponse>>, AppError> {
    let proposals = suggestion_service(&state)
        .list_mine(auth_user.principal())
        .await?;
    Ok(Json(proposals.into_iter().map(Into::into).collect()))
}

/// Pending suggestions awaiting the caller's review.
#[utoipa::path(
    get,
    path = "/pending-edits",
    tag = "Suggestions",
    operation_id = "listPendingEdits",
    summary = "List suggestions awaiting my review",
    description = "Pending suggestions on blogs the caller wrote, newest first.",
    responses(
        (status = 200, description = "Pending suggestions", body = Vec<PendingEditResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn list_pending_edits(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<PendingEditResponse>>, AppError> {
    let pending = suggestion_service(&state)
        .list_pending_for_owner(auth_user.principal())
        .await?;
    Ok(Json(pending.into_iter().map(Into::into).collect()))
}
