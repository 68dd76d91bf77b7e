//! Keyed storage for users, blogs, edit proposals, notifications and comments.
//!
//! The workflow code only talks to [`ContentStore`], so it runs unchanged
//! against [`MemoryStore`] in tests and [`SeaStore`] in production.

mod memory;
mod sea;

use async_trait::async_trait;
use blogcollab_common::{BlogStatus, NotificationKind, ProposalStatus, ReviewDecision};
use chrono::{DateTime, Utc};
use sea_orm::DbErr;

use crate::entity::{blog, comment, edit_proposal, notification, user};

pub use memory::MemoryStore;
pub use sea::SeaStore;

/// Errors raised by a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] DbErr),
    /// A unique column (`username`, `email`) already holds this value.
    #[error("duplicate value for unique field `{0}`")]
    Duplicate(&'static str),
}

pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub is_verified: bool,
    pub verification_token: Option<String>,
}

pub struct NewBlog {
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub cover_image: Option<String>,
    pub category: String,
    pub read_time: i32,
    pub status: BlogStatus,
    pub author_id: i32,
}

/// Fields an author may overwrite directly. `None` leaves the column untouched.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BlogPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub category: Option<String>,
    pub cover_image: Option<Option<String>>,
    pub read_time: Option<i32>,
    pub status: Option<BlogStatus>,
}

pub struct NewProposal {
    pub blog_id: i32,
    pub proposer_id: i32,
    pub original_title: String,
    pub original_content: String,
    pub original_excerpt: String,
    pub suggested_title: String,
    pub suggested_content: String,
    pub suggested_excerpt: String,
    pub revision_comment: Option<String>,
}

/// Conjunctive filter for proposal listings. Results are newest first.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProposalFilter {
    pub blog_id: Option<i32>,
    pub proposer_id: Option<i32>,
    /// Only proposals whose target blog is authored by this user.
    pub owner_id: Option<i32>,
    pub status: Option<ProposalStatus>,
}

pub struct NewNotification {
    pub user_id: i32,
    pub kind: NotificationKind,
    pub message: String,
    pub related_id: Option<i32>,
}

pub struct NewComment {
    pub blog_id: i32,
    pub author_id: i32,
    pub content: String,
}

/// Result of attempting the pending -> terminal transition.
#[derive(Debug, Clone, PartialEq)]
pub enum DecideOutcome {
    /// This call won the transition. `blog` is the state after the merge
    /// (unchanged on reject).
    Decided {
        proposal: edit_proposal::Model,
        blog: blog::Model,
    },
    /// Another decision got there first; the stored proposal is returned as-is.
    AlreadyDecided(edit_proposal::Model),
    /// The proposal or its target blog no longer exists.
    NotFound,
}

#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn create_user(&self, new: NewUser) -> Result<user::Model, StoreError>;
    async fn get_user(&self, id: i32) -> Result<Option<user::Model>, StoreError>;
    /// Emails are stored lowercased; callers pass the normalized form.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<user::Model>, StoreError>;
    async fn find_user_by_verification_token(
        &self,
        token: &str,
    ) -> Result<Option<user::Model>, StoreError>;
    async fn find_user_by_reset_token(&self, token: &str)
    -> Result<Option<user::Model>, StoreError>;
    /// Sets `is_verified` and clears the verification token.
    async fn mark_user_verified(&self, id: i32) -> Result<(), StoreError>;
    async fn set_reset_token(
        &self,
        id: i32,
        token: &str,
        expiry: DateTime<Utc>,
    ) -> Result<(), StoreError>;
    /// Replaces the password hash and clears any reset token.
    async fn set_password(&self, id: i32, password_hash: &str) -> Result<(), StoreError>;

    async fn create_blog(&self, new: NewBlog) -> Result<blog::Model, StoreError>;
    async fn get_blog(&self, id: i32) -> Result<Option<blog::Model>, StoreError>;
    /// Applies `patch` and advances `updated_at`. `None` if the blog is gone.
    async fn update_blog(
        &self,
        id: i32,
        patch: BlogPatch,
    ) -> Result<Option<blog::Model>, StoreError>;
    /// Deletes the blog with its proposals and comments. Notifications are kept.
    async fn delete_blog(&self, id: i32) -> Result<bool, StoreError>;

    async fn create_proposal(&self, new: NewProposal)
    -> Result<edit_proposal::Model, StoreError>;
    async fn get_proposal(&self, id: i32) -> Result<Option<edit_proposal::Model>, StoreError>;
    async fn list_proposals(
        &self,
        filter: ProposalFilter,
    ) -> Result<Vec<edit_proposal::Model>, StoreError>;
    /// Atomically moves a pending proposal to the decision's terminal status
    /// and, on accept, copies the suggested fields into the blog.
    ///
    /// The status check and write are a single compare-and-set: of two racing
    /// calls on one proposal exactly one sees `Decided`.
    async fn decide_proposal(
        &self,
        id: i32,
        decision: ReviewDecision,
        review_comment: Option<String>,
    ) -> Result<DecideOutcome, StoreError>;

    async fn create_notification(
        &self,
        new: NewNotification,
    ) -> Result<notification::Model, StoreError>;
    async fn get_notification(&self, id: i32) -> Result<Option<notification::Model>, StoreError>;
    async fn list_notifications(
        &self,
        user_id: i32,
    ) -> Result<Vec<notification::Model>, StoreError>;
    async fn count_unread_notifications(&self, user_id: i32) -> Result<u64, StoreError>;
    /// Sets `is_read`. Already-read rows are returned unchanged.
    async fn mark_notification_read(
        &self,
        id: i32,
    ) -> Result<Option<notification::Model>, StoreError>;
    /// Returns the number of rows that flipped from unread to read.
    async fn mark_all_notifications_read(&self, user_id: i32) -> Result<u64, StoreError>;

    async fn create_comment(&self, new: NewComment) -> Result<comment::Model, StoreError>;
    async fn get_comment(&self, id: i32) -> Result<Option<comment::Model>, StoreError>;
    /// Oldest first.
    async fn list_comments(&self, blog_id: i32) -> Result<Vec<comment::Model>, StoreError>;
    async fn update_comment(
        &self,
        id: i32,
        content: String,
    ) -> Result<Option<comment::Model>, StoreError>;
    async fn delete_comment(&self, id: i32) -> Result<bool, StoreError>;
}
