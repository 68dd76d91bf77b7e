//! Edit proposals: the pending -> accepted | rejected state machine.

use std::collections::HashMap;

use blogcollab_common::{NotificationKind, ProposalStatus, ReviewDecision};
use tracing::{info, warn};

use super::{NotificationService, Principal, gate};
use crate::entity::{blog, edit_proposal};
use crate::error::AppError;
use crate::mailer::{self, Mailer};
use crate::models::shared::{normalize_note, validate_content, validate_note, validate_title};
use crate::store::{ContentStore, DecideOutcome, NewProposal, ProposalFilter};

/// What a non-owner wants the blog to say.
#[derive(Debug, Clone, Default)]
pub struct EditDraft {
    pub title: String,
    pub content: String,
    /// `None` keeps the blog's current excerpt.
    pub excerpt: Option<String>,
    pub revision_comment: Option<String>,
}

/// A pending proposal with the names needed to display it.
#[derive(Debug, Clone)]
pub struct PendingEdit {
    pub proposal: edit_proposal::Model,
    pub blog_title: String,
    pub proposer_name: String,
}

pub struct SuggestionService<'a> {
    store: &'a dyn ContentStore,
    mailer: &'a dyn Mailer,
}

impl<'a> SuggestionService<'a> {
    pub fn new(store: &'a dyn ContentStore, mailer: &'a dyn Mailer) -> Self {
        Self { store, mailer }
    }

    fn notifications(&self) -> NotificationService<'a> {
        NotificationService::new(self.store)
    }

    /// Load a blog the principal is allowed to see.
    async fn visible_blog(
        &self,
        principal: Principal,
        blog_id: i32,
    ) -> Result<blog::Model, AppError> {
        self.store
            .get_blog(blog_id)
            .await?
            .filter(|b| gate::can_view_blog(Some(principal), b))
            .ok_or_else(|| AppError::NotFound("Blog not found".into()))
    }

    /// Record a suggested revision of someone else's blog. The blog itself is
    /// never touched here.
    pub async fn propose_edit(
        &self,
        principal: Principal,
        blog_id: i32,
        draft: EditDraft,
    ) -> Result<edit_proposal::Model, AppError> {
        let blog = self.visible_blog(principal, blog_id).await?;
        if gate::can_mutate_blog(principal, &blog) {
            return Err(AppError::InvalidOperation(
                "Authors edit their own blogs directly instead of suggesting edits".into(),
            ));
        }

        validate_title(&draft.title)?;
        validate_content(&draft.content)?;
        validate_note(draft.excerpt.as_deref(), "Excerpt")?;
        validate_note(draft.revision_comment.as_deref(), "Revision comment")?;

        let suggested_excerpt = draft.excerpt.unwrap_or_else(|| blog.excerpt.clone());
        let proposal = self
            .store
            .create_proposal(NewProposal {
                blog_id: blog.id,
                proposer_id: principal.id,
                original_title: blog.title.clone(),
                original_content: blog.content.clone(),
                original_excerpt: blog.excerpt.clone(),
                suggested_title: draft.title,
                suggested_content: draft.content,
                suggested_excerpt,
                revision_comment: normalize_note(draft.revision_comment),
            })
            .await?;

        info!(
            proposal_id = proposal.id,
            blog_id = blog.id,
            proposer_id = principal.id,
            "Edit proposed"
        );

        let proposer_name = self.display_name(principal.id, "Someone").await;
        self.notifications()
            .notify_best_effort(
                blog.author_id,
                NotificationKind::EditProposed,
                format!("{proposer_name} suggested edits to your blog \"{}\"", blog.title),
                Some(proposal.id),
            )
            .await;
        self.email_owner(&blog, &proposer_name).await;

        Ok(proposal)
    }

    /// Accept or reject a pending proposal. On accept the suggested fields
    /// are merged into the blog in the same atomic step as the status change.
    pub async fn decide(
        &self,
        principal: Principal,
        proposal_id: i32,
        decision: ReviewDecision,
        review_comment: Option<String>,
    ) -> Result<(edit_proposal::Model, blog::Model), AppError> {
        validate_note(review_comment.as_deref(), "Review comment")?;

        let proposal = self
            .store
            .get_proposal(proposal_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Suggestion not found".into()))?;
        if proposal.status.is_terminal() {
            return Err(already_decided(proposal.status));
        }
        let blog = self
            .store
            .get_blog(proposal.blog_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Blog not found".into()))?;
        if !gate::can_decide_proposal(principal, &blog) {
            return Err(AppError::PermissionDenied(
                "Only the blog's author can review suggested edits".into(),
            ));
        }

        let (proposal, blog) = match self
            .store
            .decide_proposal(proposal_id, decision, normalize_note(review_comment))
            .await?
        {
            DecideOutcome::Decided { proposal, blog } => (proposal, blog),
            DecideOutcome::AlreadyDecided(current) => {
                return Err(already_decided(current.status));
            }
            DecideOutcome::NotFound => {
                return Err(AppError::NotFound("Suggestion not found".into()));
            }
        };

        info!(
            proposal_id = proposal.id,
            blog_id = blog.id,
            status = %proposal.status,
            "Suggestion decided"
        );

        self.notifications()
            .notify_best_effort(
                proposal.proposer_id,
                decision.notification_kind(),
                format!(
                    "Your suggested edit to \"{}\" was {}",
                    blog.title, proposal.status
                ),
                Some(blog.id),
            )
            .await;

        Ok((proposal, blog))
    }

    /// Pending proposals on the owner's blogs, newest first.
    pub async fn list_pending_for_owner(
        &self,
        principal: Principal,
    ) -> Result<Vec<PendingEdit>, AppError> {
        let proposals = self
            .store
            .list_proposals(ProposalFilter {
                owner_id: Some(principal.id),
                status: Some(ProposalStatus::Pending),
                ..Default::default()
            })
            .await?;

        let mut blog_titles: HashMap<i32, String> = HashMap::new();
        let mut proposer_names: HashMap<i32, String> = HashMap::new();
        let mut items = Vec::with_capacity(proposals.len());
        for proposal in proposals {
            if !blog_titles.contains_key(&proposal.blog_id) {
                let title = self
                    .store
                    .get_blog(proposal.blog_id)
                    .await?
                    .map(|b| b.title)
                    .unwrap_or_default();
                blog_titles.insert(proposal.blog_id, title);
            }
            if !proposer_names.contains_key(&proposal.proposer_id) {
                let name = self.display_name(proposal.proposer_id, "Unknown").await;
                proposer_names.insert(proposal.proposer_id, name);
            }
            items.push(PendingEdit {
                blog_title: blog_titles[&proposal.blog_id].clone(),
                proposer_name: proposer_names[&proposal.proposer_id].clone(),
                proposal,
            });
        }
        Ok(items)
    }

    /// The proposer and the blog's author can read a proposal. Everyone else
    /// is told it does not exist.
    pub async fn get_visible(
        &self,
        principal: Principal,
        proposal_id: i32,
    ) -> Result<edit_proposal::Model, AppError> {
        let not_found = || AppError::NotFound("Suggestion not found".into());
        let proposal = self
            .store
            .get_proposal(proposal_id)
            .await?
            .ok_or_else(not_found)?;
        let blog = self
            .store
            .get_blog(proposal.blog_id)
            .await?
            .ok_or_else(not_found)?;
        if !gate::can_view_proposal(principal, &proposal, &blog) {
            return Err(not_found());
        }
        Ok(proposal)
    }

    /// Full proposal history of one blog. Author only.
    pub async fn list_for_blog(
        &self,
        principal: Principal,
        blog_id: i32,
    ) -> Result<Vec<edit_proposal::Model>, AppError> {
        let blog = self.visible_blog(principal, blog_id).await?;
        if !gate::can_mutate_blog(principal, &blog) {
            return Err(AppError::PermissionDenied(
                "Only the blog's author can view its suggestions".into(),
            ));
        }
        Ok(self
            .store
            .list_proposals(ProposalFilter {
                blog_id: Some(blog.id),
                ..Default::default()
            })
            .await?)
    }

    pub async fn list_mine(
        &self,
        principal: Principal,
    ) -> Result<Vec<edit_proposal::Model>, AppError> {
        Ok(self
            .store
            .list_proposals(ProposalFilter {
                proposer_id: Some(principal.id),
                ..Default::default()
            })
            .await?)
    }

    async fn display_name(&self, user_id: i32, fallback: &str) -> String {
        match self.store.get_user(user_id).await {
            Ok(Some(user)) => user.full_name,
            Ok(None) => fallback.to_string(),
            Err(e) => {
                warn!(user_id, error = %e, "Failed to load user for display");
                fallback.to_string()
            }
        }
    }

    async fn email_owner(&self, blog: &blog::Model, proposer_name: &str) {
        let owner = match self.store.get_user(blog.author_id).await {
            Ok(Some(owner)) => owner,
            Ok(None) => return,
            Err(e) => {
                warn!(blog_id = blog.id, error = %e, "Failed to load blog author for email");
                return;
            }
        };
        let email =
            mailer::edit_proposed_email(&owner.email, &owner.full_name, &blog.title, proposer_name);
        if let Err(e) = self.mailer.send(email).await {
            warn!(blog_id = blog.id, error = %e, "Failed to send suggestion email");
        }
    }
}

fn already_decided(status: ProposalStatus) -> AppError {
    AppError::Conflict(format!("Suggestion has already been {status}"))
}
