use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::notification::{
    MarkAllReadResponse, NotificationResponse, UnreadCountResponse,
};
use crate::services::notification_service;
use crate::state::AppState;

/// The caller's notifications.
#[utoipa::path(
    get,
    path = "/notifications",
    tag = "Notifications",
    operation_id = "listNotifications",
    summary = "List my notifications",
    responses(
        (status = 200, description = "Notifications, newest first", body = Vec<NotificationResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn list_notifications(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<NotificationResponse>>, AppError> {
    let notifications = notification_service(&state)
        .list_for(auth_user.principal())
        .await?;
    Ok(Json(notifications.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/notifications/count",
    tag = "Notifications",
    operation_id = "countUnreadNotifications",
    summary = "Count my unread notifications",
    responses(
        (status = 200, description = "Unread count", body = UnreadCountResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn unread_count(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<UnreadCountResponse>, AppError> {
    let count = notification_service(&state)
        .unread_count(auth_user.principal())
        .await?;
    Ok(Json(UnreadCountResponse { count }))
}

/// Mark one notification read. Marking it again is a no-op.
#[utoipa::path(
    post,
    path = "/notifications/{id}/read",
    tag = "Notifications",
    operation_id = "markNotificationRead",
    summary = "Mark a notification as read",
    params(("id" = i32, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Notification", body = NotificationResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn mark_read(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<NotificationResponse>, AppError> {
    let notification = notification_service(&state)
        .mark_read(auth_user.principal(), id)
        .await?;
    Ok(Json(notification.into()))
}

#[utoipa::path(
    post,
    path = "/notifications/read-all",
    tag = "Notifications",
    operation_id = "markAllNotificationsRead",
    summary = "Mark all my notifications as read",
    responses(
        (status = 200, description = "Number of notifications changed", body = MarkAllReadResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn mark_all_read(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<MarkAllReadResponse>, AppError> {
    let updated = notification_service(&state)
        .mark_all_read(auth_user.principal())
        .await?;
    Ok(Json(MarkAllReadResponse { updated }))
}
