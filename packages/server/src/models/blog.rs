use blogcollab_common::BlogStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{double_option, validate_content, validate_note, validate_title};
use crate::error::AppError;
use crate::store::BlogPatch;

/// Request body for creating a blog.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateBlogRequest {
    #[schema(example = "Writing async Rust")]
    pub title: String,
    /// HTML body.
    pub content: String,
    /// Short summary. Defaults to empty.
    pub excerpt: Option<String>,
    pub cover_image: Option<String>,
    #[schema(example = "programming")]
    pub category: String,
    /// Minutes. Estimated from the content when omitted.
    pub read_time: Option<i32>,
    /// Defaults to `draft`.
    pub status: Option<BlogStatus>,
}

/// Request body for `PUT /blogs/{id}`.
///
/// From the author this is a partial update. From anyone else it is an
/// edit suggestion: `title` and `content` are then required, only
/// `title`, `content`, `excerpt` and `revision_comment` are read.
#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateBlogRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub category: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub cover_image: Option<Option<String>>,
    pub read_time: Option<i32>,
    pub status: Option<BlogStatus>,
    /// Note to the author explaining a suggested edit.
    pub revision_comment: Option<String>,
}

impl UpdateBlogRequest {
    /// The fields an author applies directly.
    pub fn into_patch(self) -> BlogPatch {
        BlogPatch {
            title: self.title.map(|t| t.trim().to_string()),
            content: self.content,
            excerpt: self.excerpt,
            category: self.category.map(|c| c.trim().to_string()),
            cover_image: self.cover_image,
            read_time: self.read_time,
            status: self.status,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct BlogResponse {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub cover_image: Option<String>,
    pub category: String,
    pub read_time: i32,
    pub status: BlogStatus,
    pub author_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<crate::entity::blog::Model> for BlogResponse {
    fn from(m: crate::entity::blog::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            content: m.content,
            excerpt: m.excerpt,
            cover_image: m.cover_image,
            category: m.category,
            read_time: m.read_time,
            status: m.status,
            author_id: m.author_id,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

fn validate_category(category: &str) -> Result<(), AppError> {
    let category = category.trim();
    if category.is_empty() || category.chars().count() > 64 {
        return Err(AppError::Validation(
            "Category must be 1-64 characters".into(),
        ));
    }
    Ok(())
}

fn validate_read_time(read_time: i32) -> Result<(), AppError> {
    if !(1..=1440).contains(&read_time) {
        return Err(AppError::Validation(
            "Read time must be 1-1440 minutes".into(),
        ));
    }
    Ok(())
}

pub fn validate_create_blog(req: &CreateBlogRequest) -> Result<(), AppError> {
    validate_title(&req.title)?;
    validate_content(&req.content)?;
    validate_note(req.excerpt.as_deref(), "Excerpt")?;
    validate_category(&req.category)?;
    if let Some(rt) = req.read_time {
        validate_read_time(rt)?;
    }
    Ok(())
}

pub fn validate_blog_patch(patch: &BlogPatch) -> Result<(), AppError> {
    if let Some(ref title) = patch.title {
        validate_title(title)?;
    }
    if let Some(ref content) = patch.content {
        validate_content(content)?;
    }
    validate_note(patch.excerpt.as_deref(), "Excerpt")?;
    if let Some(ref category) = patch.category {
        validate_category(category)?;
    }
    if let Some(rt) = patch.read_time {
        validate_read_time(rt)?;
    }
    Ok(())
}
