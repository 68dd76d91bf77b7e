use blogcollab_common::BlogStatus;
use tracing::info;

use super::{EditDraft, Principal, SuggestionService, gate};
use crate::entity::{blog, edit_proposal};
use crate::error::AppError;
use crate::mailer::Mailer;
use crate::models::blog::{
    CreateBlogRequest, UpdateBlogRequest, validate_blog_patch, validate_create_blog,
};
use crate::models::shared::estimate_read_time;
use crate::store::{BlogPatch, ContentStore, NewBlog};

/// What `PUT /blogs/{id}` ended up doing.
#[derive(Debug)]
pub enum BlogWrite {
    /// The author's changes were applied.
    Updated(blog::Model),
    /// Someone else's changes were recorded as a pending suggestion.
    Proposed(edit_proposal::Model),
}

pub struct BlogService<'a> {
    store: &'a dyn ContentStore,
    mailer: &'a dyn Mailer,
}

impl<'a> BlogService<'a> {
    pub fn new(store: &'a dyn ContentStore, mailer: &'a dyn Mailer) -> Self {
        Self { store, mailer }
    }

    pub async fn create(
        &self,
        principal: Principal,
        req: CreateBlogRequest,
    ) -> Result<blog::Model, AppError> {
        validate_create_blog(&req)?;
        let read_time = req
            .read_time
            .unwrap_or_else(|| estimate_read_time(&req.content));
        let blog = self
            .store
            .create_blog(NewBlog {
                title: req.title.trim().to_string(),
                content: req.content,
                excerpt: req.excerpt.unwrap_or_default(),
                cover_image: req.cover_image,
                category: req.category.trim().to_string(),
                read_time,
                status: req.status.unwrap_or(BlogStatus::Draft),
                author_id: principal.id,
            })
            .await?;
        info!(blog_id = blog.id, author_id = principal.id, "Blog created");
        Ok(blog)
    }

    /// Drafts of other authors are reported as missing.
    pub async fn get_visible(
        &self,
        principal: Option<Principal>,
        id: i32,
    ) -> Result<blog::Model, AppError> {
        self.store
            .get_blog(id)
            .await?
            .filter(|b| gate::can_view_blog(principal, b))
            .ok_or_else(|| AppError::NotFound("Blog not found".into()))
    }

    /// Direct overwrite. Author only; there is no proposal involved.
    pub async fn update(
        &self,
        principal: Principal,
        id: i32,
        patch: BlogPatch,
    ) -> Result<blog::Model, AppError> {
        let blog = self.get_visible(Some(principal), id).await?;
        if !gate::can_mutate_blog(principal, &blog) {
            return Err(AppError::PermissionDenied(
                "Only the author can update this blog; suggest an edit instead".into(),
            ));
        }
        validate_blog_patch(&patch)?;
        let updated = self
            .store
            .update_blog(id, patch)
            .await?
            .ok_or_else(|| AppError::NotFound("Blog not found".into()))?;
        info!(blog_id = id, "Blog updated by author");
        Ok(updated)
    }

    /// The author's write goes straight to the blog. Anyone else's becomes
    /// a pending suggestion for the author to review.
    pub async fn update_or_propose(
        &self,
        principal: Principal,
        id: i32,
        req: UpdateBlogRequest,
    ) -> Result<BlogWrite, AppError> {
        let blog = self.get_visible(Some(principal), id).await?;
        if gate::can_mutate_blog(principal, &blog) {
            return self
                .update(principal, id, req.into_patch())
                .await
                .map(BlogWrite::Updated);
        }

        let (Some(title), Some(content)) = (req.title, req.content) else {
            return Err(AppError::Validation(
                "Title and content are required to suggest an edit".into(),
            ));
        };
        let draft = EditDraft {
            title,
            content,
            excerpt: req.excerpt,
            revision_comment: req.revision_comment,
        };
        SuggestionService::new(self.store, self.mailer)
            .propose_edit(principal, id, draft)
            .await
            .map(BlogWrite::Proposed)
    }

    pub async fn delete(&self, principal: Principal, id: i32) -> Result<(), AppError> {
        let blog = self.get_visible(Some(principal), id).await?;
        if !gate::can_mutate_blog(principal, &blog) {
            return Err(AppError::PermissionDenied(
                "Only the author can delete this blog".into(),
            ));
        }
        if !self.store.delete_blog(id).await? {
            return Err(AppError::NotFound("Blog not found".into()));
        }
        info!(blog_id = id, "Blog deleted");
        Ok(())
    }
}
