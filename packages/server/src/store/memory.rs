use std::collections::BTreeMap;

use async_trait::async_trait;
use blogcollab_common::{ProposalStatus, ReviewDecision};
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{
    BlogPatch, ContentStore, DecideOutcome, NewBlog, NewComment, NewNotification, NewProposal,
    NewUser, ProposalFilter, StoreError,
};
use crate::entity::{blog, comment, edit_proposal, notification, user};

/// In-process store. All collections sit behind one lock, so every
/// operation (including id issuance) is atomic with respect to the others.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    users: BTreeMap<i32, user::Model>,
    blogs: BTreeMap<i32, blog::Model>,
    proposals: BTreeMap<i32, edit_proposal::Model>,
    notifications: BTreeMap<i32, notification::Model>,
    comments: BTreeMap<i32, comment::Model>,
    sequences: Sequences,
}

#[derive(Default)]
struct Sequences {
    user: i32,
    blog: i32,
    proposal: i32,
    notification: i32,
    comment: i32,
}

fn next_id(counter: &mut i32) -> i32 {
    *counter += 1;
    *counter
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first<T, F>(mut rows: Vec<T>, key: F) -> Vec<T>
where
    F: Fn(&T) -> (DateTime<Utc>, i32),
{
    rows.sort_by_key(|r| std::cmp::Reverse(key(r)));
    rows
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn create_user(&self, new: NewUser) -> Result<user::Model, StoreError> {
        let mut t = self.tables.write().await;
        if t.users.values().any(|u| u.username == new.username) {
            return Err(StoreError::Duplicate("username"));
        }
        if t.users.values().any(|u| u.email == new.email) {
            return Err(StoreError::Duplicate("email"));
        }
        let id = next_id(&mut t.sequences.user);
        let model = user::Model {
            id,
            username: new.username,
            email: new.email,
            password: new.password,
            full_name: new.full_name,
            is_verified: new.is_verified,
            verification_token: new.verification_token,
            reset_token: None,
            reset_token_expiry: None,
            created_at: Utc::now(),
        };
        t.users.insert(id, model.clone());
        Ok(model)
    }

    async fn get_user(&self, id: i32) -> Result<Option<user::Model>, StoreError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<user::Model>, StoreError> {
        let t = self.tables.read().await;
        Ok(t.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_verification_token(
        &self,
        token: &str,
    ) -> Result<Option<user::Model>, StoreError> {
        let t = self.tables.read().await;
        Ok(t
            .users
            .values()
            .find(|u| u.verification_token.as_deref() == Some(token))
            .cloned())
    }

    async fn find_user_by_reset_token(
        &self,
        token: &str,
    ) -> Result<Option<user::Model>, StoreError> {
        let t = self.tables.read().await;
        Ok(t
            .users
            .values()
            .find(|u| u.reset_token.as_deref() == Some(token))
            .cloned())
    }

    async fn mark_user_verified(&self, id: i32) -> Result<(), StoreError> {
        let mut t = self.tables.write().await;
        if let Some(u) = t.users.get_mut(&id) {
            u.is_verified = true;
            u.verification_token = None;
        }
        Ok(())
    }

    async fn set_reset_token(
        &self,
        id: i32,
        token: &str,
        expiry: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut t = self.tables.write().await;
        if let Some(u) = t.users.get_mut(&id) {
            u.reset_token = Some(token.to_string());
            u.reset_token_expiry = Some(expiry);
        }
        Ok(())
    }

    async fn set_password(&self, id: i32, password_hash: &str) -> Result<(), StoreError> {
        let mut t = self.tables.write().await;
        if let Some(u) = t.users.get_mut(&id) {
            u.password = password_hash.to_string();
            u.reset_token = None;
            u.reset_token_expiry = None;
        }
        Ok(())
    }

    async fn create_blog(&self, new: NewBlog) -> Result<blog::Model, StoreError> {
        let mut t = self.tables.write().await;
        let id = next_id(&mut t.sequences.blog);
        let now = Utc::now();
        let model = blog::Model {
            id,
            title: new.title,
            content: new.content,
            excerpt: new.excerpt,
            cover_image: new.cover_image,
            category: new.category,
            read_time: new.read_time,
            status: new.status,
            author_id: new.author_id,
            created_at: now,
            updated_at: now,
        };
        t.blogs.insert(id, model.clone());
        Ok(model)
    }

    async fn get_blog(&self, id: i32) -> Result<Option<blog::Model>, StoreError> {
        Ok(self.tables.read().await.blogs.get(&id).cloned())
    }

    async fn update_blog(
        &self,
        id: i32,
        patch: BlogPatch,
    ) -> Result<Option<blog::Model>, StoreError> {
        let mut t = self.tables.write().await;
        let Some(b) = t.blogs.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(title) = patch.title {
            b.title = title;
        }
        if let Some(content) = patch.content {
            b.content = content;
        }
        if let Some(excerpt) = patch.excerpt {
            b.excerpt = excerpt;
        }
        if let Some(category) = patch.category {
            b.category = category;
        }
        if let Some(cover_image) = patch.cover_image {
            b.cover_image = cover_image;
        }
        if let Some(read_time) = patch.read_time {
            b.read_time = read_time;
        }
        if let Some(status) = patch.status {
            b.status = status;
        }
        b.updated_at = Utc::now();
        Ok(Some(b.clone()))
    }

    async fn delete_blog(&self, id: i32) -> Result<bool, StoreError> {
        let mut t = self.tables.write().await;
        if t.blogs.remove(&id).is_none() {
            return Ok(false);
        }
        t.proposals.retain(|_, p| p.blog_id != id);
        t.comments.retain(|_, c| c.blog_id != id);
        Ok(true)
    }

    async fn create_proposal(
        &self,
        new: NewProposal,
    ) -> Result<edit_proposal::Model, StoreError> {
        let mut t = self.tables.write().await;
        let id = next_id(&mut t.sequences.proposal);
        let model = edit_proposal::Model {
            id,
            blog_id: new.blog_id,
            proposer_id: new.proposer_id,
            original_title: new.original_title,
            original_content: new.original_content,
            original_excerpt: new.original_excerpt,
            suggested_title: new.suggested_title,
            suggested_content: new.suggested_content,
            suggested_excerpt: new.suggested_excerpt,
            revision_comment: new.revision_comment,
            status: ProposalStatus::Pending,
            decided_at: None,
            review_comment: None,
            created_at: Utc::now(),
        };
        t.proposals.insert(id, model.clone());
        Ok(model)
    }

    async fn get_proposal(&self, id: i32) -> Result<Option<edit_proposal::Model>, StoreError> {
        Ok(self.tables.read().await.proposals.get(&id).cloned())
    }

    async fn list_proposals(
        &self,
        filter: ProposalFilter,
    ) -> Result<Vec<edit_proposal::Model>, StoreError> {
        let t = self.tables.read().await;
        let rows = t
            .proposals
            .values()
            .filter(|p| filter.blog_id.is_none_or(|id| p.blog_id == id))
            .filter(|p| filter.proposer_id.is_none_or(|id| p.proposer_id == id))
            .filter(|p| filter.status.is_none_or(|s| p.status == s))
            .filter(|p| {
                filter.owner_id.is_none_or(|owner| {
                    t.blogs
                        .get(&p.blog_id)
                        .is_some_and(|b| b.author_id == owner)
                })
            })
            .cloned()
            .collect();
        Ok(newest_first(rows, |p: &edit_proposal::Model| {
            (p.created_at, p.id)
        }))
    }

    async fn decide_proposal(
        &self,
        id: i32,
        decision: ReviewDecision,
        review_comment: Option<String>,
    ) -> Result<DecideOutcome, StoreError> {
        let mut t = self.tables.write().await;
        let Tables {
            proposals, blogs, ..
        } = &mut *t;

        let Some(proposal) = proposals.get_mut(&id) else {
            return Ok(DecideOutcome::NotFound);
        };
        if proposal.status.is_terminal() {
            return Ok(DecideOutcome::AlreadyDecided(proposal.clone()));
        }
        let Some(blog) = blogs.get_mut(&proposal.blog_id) else {
            return Ok(DecideOutcome::NotFound);
        };

        let now = Utc::now();
        if decision == ReviewDecision::Accept {
            blog.title = proposal.suggested_title.clone();
            blog.content = proposal.suggested_content.clone();
            blog.excerpt = proposal.suggested_excerpt.clone();
            blog.updated_at = now;
        }
        proposal.status = decision.target_status();
        proposal.decided_at = Some(now);
        proposal.review_comment = review_comment;

        Ok(DecideOutcome::Decided {
            proposal: proposal.clone(),
            blog: blog.clone(),
        })
    }

    async fn create_notification(
        &self,
        new: NewNotification,
    ) -> Result<notification::Model, StoreError> {
        let mut t = self.tables.write().await;
        let id = next_id(&mut t.sequences.notification);
        let model = notification::Model {
            id,
            user_id: new.user_id,
            kind: new.kind,
            message: new.message,
            related_id: new.related_id,
            is_read: false,
            created_at: Utc::now(),
        };
        t.notifications.insert(id, model.clone());
        Ok(model)
    }

    async fn get_notification(&self, id: i32) -> Result<Option<notification::Model>, StoreError> {
        Ok(self.tables.read().await.notifications.get(&id).cloned())
    }

    async fn list_notifications(
        &self,
        user_id: i32,
    ) -> Result<Vec<notification::Model>, StoreError> {
        let t = self.tables.read().await;
        let rows = t
            .notifications
            .values()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        Ok(newest_first(rows, |n: &notification::Model| {
            (n.created_at, n.id)
        }))
    }

    async fn count_unread_notifications(&self, user_id: i32) -> Result<u64, StoreError> {
        let t = self.tables.read().await;
        Ok(t
            .notifications
            .values()
            .filter(|n| n.user_id == user_id && !n.is_read)
            .count() as u64)
    }

    async fn mark_notification_read(
        &self,
        id: i32,
    ) -> Result<Option<notification::Model>, StoreError> {
        let mut t = self.tables.write().await;
        Ok(t.notifications.get_mut(&id).map(|n| {
            n.is_read = true;
            n.clone()
        }))
    }

    async fn mark_all_notifications_read(&self, user_id: i32) -> Result<u64, StoreError> {
        let mut t = self.tables.write().await;
        let mut changed = 0;
        for n in t.notifications.values_mut() {
            if n.user_id == user_id && !n.is_read {
                n.is_read = true;
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn create_comment(&self, new: NewComment) -> Result<comment::Model, StoreError> {
        let mut t = self.tables.write().await;
        let id = next_id(&mut t.sequences.comment);
        let now = Utc::now();
        let model = comment::Model {
            id,
            blog_id: new.blog_id,
            author_id: new.author_id,
            content: new.content,
            created_at: now,
            updated_at: now,
        };
        t.comments.insert(id, model.clone());
        Ok(model)
    }

    async fn get_comment(&self, id: i32) -> Result<Option<comment::Model>, StoreError> {
        Ok(self.tables.read().await.comments.get(&id).cloned())
    }

    async fn list_comments(&self, blog_id: i32) -> Result<Vec<comment::Model>, StoreError> {
        let t = self.tables.read().await;
        // BTreeMap iteration is id order, which is creation order.
        Ok(t
            .comments
            .values()
            .filter(|c| c.blog_id == blog_id)
            .cloned()
            .collect())
    }

    async fn update_comment(
        &self,
        id: i32,
        content: String,
    ) -> Result<Option<comment::Model>, StoreError> {
        let mut t = self.tables.write().await;
        Ok(t.comments.get_mut(&id).map(|c| {
            c.content = content;
            c.updated_at = Utc::now();
            c.clone()
        }))
    }

    async fn delete_comment(&self, id: i32) -> Result<bool, StoreError> {
        Ok(self.tables.write().await.comments.remove(&id).is_some())
    }
}
