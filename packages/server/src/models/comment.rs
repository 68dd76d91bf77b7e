use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateCommentRequest {
    pub blog_id: i32,
    pub content: String,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateCommentRequest {
    pub content: String,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct CommentListQuery {
    /// Blog whose comments to list.
    pub blog_id: i32,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CommentResponse {
    pub id: i32,
    pub blog_id: i32,
    pub author_id: i32,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<crate::entity::comment::Model> for CommentResponse {
    fn from(m: crate::entity::comment::Model) -> Self {
        Self {
            id: m.id,
            blog_id: m.blog_id,
            author_id: m.author_id,
            content: m.content,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

pub fn validate_comment_content(content: &str) -> Result<(), AppError> {
    let content = content.trim();
    if content.is_empty() || content.chars().count() > 10_000 {
        return Err(AppError::Validation(
            "Comment must be 1-10000 characters".into(),
        ));
    }
    Ok(())
}
