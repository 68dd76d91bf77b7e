//! Workflow logic shared by the HTTP handlers.
//!
//! Every service borrows its collaborators from [`AppState`], so handlers
//! build one per request with the `*_service` constructors below.

pub mod blog;
pub mod comment;
pub mod gate;
pub mod notification;
pub mod suggestion;

pub use blog::{BlogService, BlogWrite};
pub use comment::CommentService;
pub use gate::Principal;
pub use notification::NotificationService;
pub use suggestion::{EditDraft, PendingEdit, SuggestionService};

use crate::state::AppState;

pub fn blog_service(state: &AppState) -> BlogService<'_> {
    BlogService::new(state.store.as_ref(), state.mailer.as_ref())
}

pub fn suggestion_service(state: &AppState) -> SuggestionService<'_> {
    SuggestionService::new(state.store.as_ref(), state.mailer.as_ref())
}

pub fn notification_service(state: &AppState) -> NotificationService<'_> {
    NotificationService::new(state.store.as_ref())
}

pub fn comment_service(state: &AppState) -> CommentService<'_> {
    CommentService::new(state.store.as_ref())
}
