use async_trait::async_trait;
use blogcollab_common::{ProposalStatus, ReviewDecision};
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, Query as SeaQuery};
use sea_orm::*;

use super::{
    BlogPatch, ContentStore, DecideOutcome, NewBlog, NewComment, NewNotification, NewProposal,
    NewUser, ProposalFilter, StoreError,
};
use crate::entity::{blog, comment, edit_proposal, notification, user};

/// SeaORM-backed store. Works against any backend SeaORM was built with.
#[derive(Clone)]
pub struct SeaStore {
    db: DatabaseConnection,
}

impl SeaStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Map a unique-constraint violation on `user` to the offending field.
fn user_insert_error(err: DbErr) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            tracing::debug!("Registration race condition: unique constraint caught on insert");
            if detail.contains("email") {
                StoreError::Duplicate("email")
            } else {
                StoreError::Duplicate("username")
            }
        }
        _ => StoreError::Database(err),
    }
}

#[async_trait]
impl ContentStore for SeaStore {
    async fn create_user(&self, new: NewUser) -> Result<user::Model, StoreError> {
        let taken = user::Entity::find()
            .filter(user::Column::Username.eq(&new.username))
            .one(&self.db)
            .await?;
        if taken.is_some() {
            return Err(StoreError::Duplicate("username"));
        }
        let taken = user::Entity::find()
            .filter(user::Column::Email.eq(&new.email))
            .one(&self.db)
            .await?;
        if taken.is_some() {
            return Err(StoreError::Duplicate("email"));
        }

        user::ActiveModel {
            username: Set(new.username),
            email: Set(new.email),
            password: Set(new.password),
            full_name: Set(new.full_name),
            is_verified: Set(new.is_verified),
            verification_token: Set(new.verification_token),
            reset_token: Set(None),
            reset_token_expiry: Set(None),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(user_insert_error)
    }

    async fn get_user(&self, id: i32) -> Result<Option<user::Model>, StoreError> {
        Ok(user::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<user::Model>, StoreError> {
        Ok(user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?)
    }

    async fn find_user_by_verification_token(
        &self,
        token: &str,
    ) -> Result<Option<user::Model>, StoreError> {
        Ok(user::Entity::find()
            .filter(user::Column::VerificationToken.eq(token))
            .one(&self.db)
            .await?)
    }

    async fn find_user_by_reset_token(
        &self,
        token: &str,
    ) -> Result<Option<user::Model>, StoreError> {
        Ok(user::Entity::find()
            .filter(user::Column::ResetToken.eq(token))
            .one(&self.db)
            .await?)
    }

    async fn mark_user_verified(&self, id: i32) -> Result<(), StoreError> {
        user::Entity::update_many()
            .col_expr(user::Column::IsVerified, Expr::value(true))
            .col_expr(
                user::Column::VerificationToken,
                Expr::value(Option::<String>::None),
            )
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn set_reset_token(
        &self,
        id: i32,
        token: &str,
        expiry: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        user::Entity::update_many()
            .col_expr(user::Column::ResetToken, Expr::value(token))
            .col_expr(user::Column::ResetTokenExpiry, Expr::value(expiry))
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn set_password(&self, id: i32, password_hash: &str) -> Result<(), StoreError> {
        user::Entity::update_many()
            .col_expr(user::Column::Password, Expr::value(password_hash))
            .col_expr(user::Column::ResetToken, Expr::value(Option::<String>::None))
            .col_expr(
                user::Column::ResetTokenExpiry,
                Expr::value(Option::<DateTime<Utc>>::None),
            )
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn create_blog(&self, new: NewBlog) -> Result<blog::Model, StoreError> {
        let now = Utc::now();
        let model = blog::ActiveModel {
            title: Set(new.title),
            content: Set(new.content),
            excerpt: Set(new.excerpt),
            cover_image: Set(new.cover_image),
            category: Set(new.category),
            read_time: Set(new.read_time),
            status: Set(new.status),
            author_id: Set(new.author_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        Ok(model)
    }

    async fn get_blog(&self, id: i32) -> Result<Option<blog::Model>, StoreError> {
        Ok(blog::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn update_blog(
        &self,
        id: i32,
        patch: BlogPatch,
    ) -> Result<Option<blog::Model>, StoreError> {
        let txn = self.db.begin().await?;

        let Some(existing) = blog::Entity::find_by_id(id).one(&txn).await? else {
            return Ok(None);
        };
        let mut active: blog::ActiveModel = existing.into();

        if let Some(title) = patch.title {
            active.title = Set(title);
        }
        if let Some(content) = patch.content {
            active.content = Set(content);
        }
        if let Some(excerpt) = patch.excerpt {
            active.excerpt = Set(excerpt);
        }
        if let Some(category) = patch.category {
            active.category = Set(category);
        }
        if let Some(cover_image) = patch.cover_image {
            active.cover_image = Set(cover_image);
        }
        if let Some(read_time) = patch.read_time {
            active.read_time = Set(read_time);
        }
        if let Some(status) = patch.status {
            active.status = Set(status);
        }
        active.updated_at = Set(Utc::now());

        let model = active.update(&txn).await?;
        txn.commit().await?;
        Ok(Some(model))
    }

    async fn delete_blog(&self, id: i32) -> Result<bool, StoreError> {
        let txn = self.db.begin().await?;

        edit_proposal::Entity::delete_many()
            .filter(edit_proposal::Column::BlogId.eq(id))
            .exec(&txn)
            .await?;
        comment::Entity::delete_many()
            .filter(comment::Column::BlogId.eq(id))
            .exec(&txn)
            .await?;
        let result = blog::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(result.rows_affected > 0)
    }

    async fn create_proposal(
        &self,
        new: NewProposal,
    ) -> Result<edit_proposal::Model, StoreError> {
        let model = edit_proposal::ActiveModel {
            blog_id: Set(new.blog_id),
            proposer_id: Set(new.proposer_id),
            original_title: Set(new.original_title),
            original_content: Set(new.original_content),
            original_excerpt: Set(new.original_excerpt),
            suggested_title: Set(new.suggested_title),
            suggested_content: Set(new.suggested_content),
            suggested_excerpt: Set(new.suggested_excerpt),
            revision_comment: Set(new.revision_comment),
            status: Set(ProposalStatus::Pending),
            decided_at: Set(None),
            review_comment: Set(None),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        Ok(model)
    }

    async fn get_proposal(&self, id: i32) -> Result<Option<edit_proposal::Model>, StoreError> {
        Ok(edit_proposal::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn list_proposals(
        &self,
        filter: ProposalFilter,
    ) -> Result<Vec<edit_proposal::Model>, StoreError> {
        let mut query = edit_proposal::Entity::find();

        if let Some(blog_id) = filter.blog_id {
            query = query.filter(edit_proposal::Column::BlogId.eq(blog_id));
        }
        if let Some(proposer_id) = filter.proposer_id {
            query = query.filter(edit_proposal::Column::ProposerId.eq(proposer_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(edit_proposal::Column::Status.eq(status));
        }
        if let Some(owner_id) = filter.owner_id {
            query = query.filter(
                edit_proposal::Column::BlogId.in_subquery(
                    SeaQuery::select()
                        .column(blog::Column::Id)
                        .from(blog::Entity)
                        .and_where(blog::Column::AuthorId.eq(owner_id))
                        .to_owned(),
                ),
            );
        }

        Ok(query
            .order_by_desc(edit_proposal::Column::CreatedAt)
            .order_by_desc(edit_proposal::Column::Id)
            .all(&self.db)
            .await?)
    }

    async fn decide_proposal(
        &self,
        id: i32,
        decision: ReviewDecision,
        review_comment: Option<String>,
    ) -> Result<DecideOutcome, StoreError> {
        let now = Utc::now();
        let txn = self.db.begin().await?;

        let transition = edit_proposal::Entity::update_many()
            .col_expr(
                edit_proposal::Column::Status,
                Expr::value(decision.target_status()),
            )
            .col_expr(edit_proposal::Column::DecidedAt, Expr::value(now))
            .col_expr(edit_proposal::Column::ReviewComment, Expr::value(review_comment))
            .filter(edit_proposal::Column::Id.eq(id))
            .filter(edit_proposal::Column::Status.eq(ProposalStatus::Pending))
            .exec(&txn)
            .await?;

        if transition.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(match self.get_proposal(id).await? {
                Some(existing) => DecideOutcome::AlreadyDecided(existing),
                None => DecideOutcome::NotFound,
            });
        }

        let Some(proposal) = edit_proposal::Entity::find_by_id(id).one(&txn).await? else {
            txn.rollback().await?;
            return Ok(DecideOutcome::NotFound);
        };

        if decision == ReviewDecision::Accept {
            blog::Entity::update_many()
                .col_expr(
                    blog::Column::Title,
                    Expr::value(proposal.suggested_title.clone()),
                )
                .col_expr(
                    blog::Column::Content,
                    Expr::value(proposal.suggested_content.clone()),
                )
                .col_expr(
                    blog::Column::Excerpt,
                    Expr::value(proposal.suggested_excerpt.clone()),
                )
                .col_expr(blog::Column::UpdatedAt, Expr::value(now))
                .filter(blog::Column::Id.eq(proposal.blog_id))
                .exec(&txn)
                .await?;
        }

        let Some(blog) = blog::Entity::find_by_id(proposal.blog_id).one(&txn).await? else {
            txn.rollback().await?;
            return Ok(DecideOutcome::NotFound);
        };

        txn.commit().await?;
        Ok(DecideOutcome::Decided { proposal, blog })
    }

    async fn create_notification(
        &self,
        new: NewNotification,
    ) -> Result<notification::Model, StoreError> {
        let model = notification::ActiveModel {
            user_id: Set(new.user_id),
            kind: Set(new.kind),
            message: Set(new.message),
            related_id: Set(new.related_id),
            is_read: Set(false),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        Ok(model)
    }

    async fn get_notification(&self, id: i32) -> Result<Option<notification::Model>, StoreError> {
        Ok(notification::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn list_notifications(
        &self,
        user_id: i32,
    ) -> Result<Vec<notification::Model>, StoreError> {
        Ok(notification::Entity::find()
            .filter(notification::Column::UserId.eq(user_id))
            .order_by_desc(notification::Column::CreatedAt)
            .order_by_desc(notification::Column::Id)
            .all(&self.db)
            .await?)
    }

    async fn count_unread_notifications(&self, user_id: i32) -> Result<u64, StoreError> {
        Ok(notification::Entity::find()
            .filter(notification::Column::UserId.eq(user_id))
            .filter(notification::Column::IsRead.eq(false))
            .count(&self.db)
            .await?)
    }

    async fn mark_notification_read(
        &self,
        id: i32,
    ) -> Result<Option<notification::Model>, StoreError> {
        notification::Entity::update_many()
            .col_expr(notification::Column::IsRead, Expr::value(true))
            .filter(notification::Column::Id.eq(id))
            .filter(notification::Column::IsRead.eq(false))
            .exec(&self.db)
            .await?;
        self.get_notification(id).await
    }

    async fn mark_all_notifications_read(&self, user_id: i32) -> Result<u64, StoreError> {
        let result = notification::Entity::update_many()
            .col_expr(notification::Column::IsRead, Expr::value(true))
            .filter(notification::Column::UserId.eq(user_id))
            .filter(notification::Column::IsRead.eq(false))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }

    async fn create_comment(&self, new: NewComment) -> Result<comment::Model, StoreError> {
        let now = Utc::now();
        let model = comment::ActiveModel {
            blog_id: Set(new.blog_id),
            author_id: Set(new.author_id),
            content: Set(new.content),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        Ok(model)
    }

    async fn get_comment(&self, id: i32) -> Result<Option<comment::Model>, StoreError> {
        Ok(comment::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn list_comments(&self, blog_id: i32) -> Result<Vec<comment::Model>, StoreError> {
        Ok(comment::Entity::find()
            .filter(comment::Column::BlogId.eq(blog_id))
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .all(&self.db)
            .await?)
    }

    async fn update_comment(
        &self,
        id: i32,
        content: String,
    ) -> Result<Option<comment::Model>, StoreError> {
        let Some(existing) = self.get_comment(id).await? else {
            return Ok(None);
        };
        let mut active: comment::ActiveModel = existing.into();
        active.content = Set(content);
        active.updated_at = Set(Utc::now());
        Ok(Some(active.update(&self.db).await?))
    }

    async fn delete_comment(&self, id: i32) -> Result<bool, StoreError> {
        let result = comment::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}
