use tracing::info;

use super::{Principal, gate};
use crate::entity::{blog, comment};
use crate::error::AppError;
use crate::models::comment::validate_comment_content;
use crate::store::{ContentStore, NewComment};

pub struct CommentService<'a> {
    store: &'a dyn ContentStore,
}

impl<'a> CommentService<'a> {
    pub fn new(store: &'a dyn ContentStore) -> Self {
        Self { store }
    }

    async fn visible_blog(
        &self,
        principal: Option<Principal>,
        blog_id: i32,
    ) -> Result<blog::Model, AppError> {
        self.store
            .get_blog(blog_id)
            .await?
            .filter(|b| gate::can_view_blog(principal, b))
            .ok_or_else(|| AppError::NotFound("Blog not found".into()))
    }

    /// Oldest first.
    pub async fn list(
        &self,
        principal: Option<Principal>,
        blog_id: i32,
    ) -> Result<Vec<comment::Model>, AppError> {
        let blog = self.visible_blog(principal, blog_id).await?;
        Ok(self.store.list_comments(blog.id).await?)
    }

    pub async fn get(
        &self,
        principal: Option<Principal>,
        id: i32,
    ) -> Result<comment::Model, AppError> {
        let comment = self.load(id).await?;
        self.visible_blog(principal, comment.blog_id)
            .await
            .map_err(|_| AppError::NotFound("Comment not found".into()))?;
        Ok(comment)
    }

    pub async fn create(
        &self,
        principal: Principal,
        blog_id: i32,
        content: String,
    ) -> Result<comment::Model, AppError> {
        validate_comment_content(&content)?;
        let blog = self
            .store
            .get_blog(blog_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Blog not found".into()))?;
        if !blog.status.is_published() {
            return Err(AppError::PermissionDenied(
                "Cannot comment on unpublished content".into(),
            ));
        }
        let comment = self
            .store
            .create_comment(NewComment {
                blog_id,
                author_id: principal.id,
                content: content.trim().to_string(),
            })
            .await?;
        info!(comment_id = comment.id, blog_id, "Comment created");
        Ok(comment)
    }

    pub async fn update(
        &self,
        principal: Principal,
        id: i32,
        content: String,
    ) -> Result<comment::Model, AppError> {
        validate_comment_content(&content)?;
        self.authorize(principal, id).await?;
        self.store
            .update_comment(id, content.trim().to_string())
            .await?
            .ok_or_else(|| AppError::NotFound("Comment not found".into()))
    }

    pub async fn delete(&self, principal: Principal, id: i32) -> Result<(), AppError> {
        self.authorize(principal, id).await?;
        if !self.store.delete_comment(id).await? {
            return Err(AppError::NotFound("Comment not found".into()));
        }
        info!(comment_id = id, "Comment deleted");
        Ok(())
    }

    async fn load(&self, id: i32) -> Result<comment::Model, AppError> {
        self.store
            .get_comment(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Comment not found".into()))
    }

    async fn authorize(&self, principal: Principal, id: i32) -> Result<(), AppError> {
        let comment = self.load(id).await?;
        let blog = self
            .store
            .get_blog(comment.blog_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Comment not found".into()))?;
        if !gate::can_mutate_comment(principal, &comment, &blog) {
            return Err(AppError::PermissionDenied(
                "Only the comment's author or the blog's author can change this comment".into(),
            ));
        }
        Ok(())
    }
}
