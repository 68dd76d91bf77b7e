use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::blog::{BlogResponse, CreateBlogRequest, UpdateBlogRequest};
use crate::models::suggestion::SuggestionResponse;
use crate::services::{BlogWrite, blog_service, suggestion_service};
use crate::state::AppState;

/// Create a blog owned by the caller.
#[utoipa::path(
    post,
    path = "/blogs",
    tag = "Blogs",
    operation_id = "createBlog",
    summary = "Create a blog",
    description = "Creates a blog authored by the caller. Status defaults to `draft`.",
    request_body = CreateBlogRequest,
    responses(
        (status = 201, description = "Blog created", body = BlogResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id))]
pub async fn create_blog(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateBlogRequest>,
) -> Result<impl IntoResponse, AppError> {
    let blog = blog_service(&state)
        .create(auth_user.principal(), payload)
        .await?;
    Ok((StatusCode::CREATED, Json(BlogResponse::from(blog))))
}

/// Read a blog.
#[utoipa::path(
    get,
    path = "/blogs/{id}",
    tag = "Blogs",
    operation_id = "getBlog",
    summary = "Get a blog",
    description = "Published blogs are public. Drafts are visible to their author only.",
    params(("id" = i32, Path, description = "Blog ID")),
    responses(
        (status = 200, description = "Blog", body = BlogResponse),
        (status = 404, description = "Not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, auth_user))]
pub async fn get_blog(
    auth_user: Option<AuthUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<BlogResponse>, AppError> {
    let blog = blog_service(&state)
        .get_visible(auth_user.map(|u| u.principal()), id)
        .await?;
    Ok(Json(blog.into()))
}

/// Update a blog, or suggest an edit to it.
#[utoipa::path(
    put,
    path = "/blogs/{id}",
    tag = "Blogs",
    operation_id = "updateBlog",
    summary = "Update a blog or suggest an edit",
    description = "The author's request overwrites the given fields and returns the blog (200). \
        Anyone else's request is stored as a pending suggestion for the author to review \
        and returns the suggestion (201); `title` and `content` are then required.",
    params(("id" = i32, Path, description = "Blog ID")),
    request_body = UpdateBlogRequest,
    responses(
        (status = 200, description = "Blog updated by its author", body = BlogResponse),
        (status = 201, description = "Suggestion created", body = SuggestionResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id))]
pub async fn update_blog(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateBlogRequest>,
) -> Result<Response, AppError> {
    let written = blog_service(&state)
        .update_or_propose(auth_user.principal(), id, payload)
        .await?;
    Ok(match written {
        BlogWrite::Updated(blog) => Json(BlogResponse::from(blog)).into_response(),
        BlogWrite::Proposed(proposal) => {
            (StatusCode::CREATED, Json(SuggestionResponse::from(proposal))).into_response()
        }
    })
}

/// Delete a blog with its suggestions and comments.
#[utoipa::path(
    delete,
    path = "/blogs/{id}",
    tag = "Blogs",
    operation_id = "deleteBlog",
    summary = "Delete a blog",
    params(("id" = i32, Path, description = "Blog ID")),
    responses(
        (status = 204, description = "Blog deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the author (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn delete_blog(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    blog_service(&state)
        .delete(auth_user.principal(), id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Revision history of a blog.
#[utoipa::path(
    get,
    path = "/blogs/{id}/suggestions",
    tag = "Blogs",
    operation_id = "listBlogSuggestions",
    summary = "List all suggestions for a blog",
    description = "Every suggestion ever made on the blog, newest first. Author only.",
    params(("id" = i32, Path, description = "Blog ID")),
    responses(
        (status = 200, description = "Suggestions", body = Vec<SuggestionResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the author (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn list_blog_suggestions(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<SuggestionResponse>>, AppError> {
    let proposals = suggestion_service(&state)
        .list_for_blog(auth_user.principal(), id)
        .await?;
    Ok(Json(proposals.into_iter().map(Into::into).collect()))
}
