use utoipa_axum::{router::OpenApiRouter, routes};

use crate::handlers::{auth, blog, comment, notification, suggestion};
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .merge(auth_routes())
        .merge(blog_routes())
        .merge(suggestion_routes())
        .merge(notification_routes())
        .merge(comment_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(auth::register))
        .routes(routes!(auth::login))
        .routes(routes!(auth::me))
        .routes(routes!(auth::verify_email))
        .routes(routes!(auth::forgot_password))
        .routes(routes!(auth::reset_password))
}

fn blog_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(blog::create_blog))
        .routes(routes!(blog::get_blog, blog::update_blog, blog::delete_blog))
        .routes(routes!(blog::list_blog_suggestions))
}

fn suggestion_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(suggestion::create_suggestion))
        .routes(routes!(suggestion::list_my_suggestions))
        .routes(routes!(
            suggestion::get_suggestion,
            suggestion::review_suggestion
        ))
        .routes(routes!(suggestion::list_pending_edits))
}

fn notification_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(notification::list_notifications))
        .routes(routes!(notification::unread_count))
        .routes(routes!(notification::mark_all_read))
        .routes(routes!(notification::mark_read))
}

fn comment_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(comment::list_comments, comment::create_comment))
        .routes(routes!(
            comment::get_comment,
            comment::update_comment,
            comment::delete_comment
        ))
}
