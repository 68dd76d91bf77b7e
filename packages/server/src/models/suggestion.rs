use blogcollab_common::{ProposalStatus, ReviewDecision};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::services::suggestion::{EditDraft, PendingEdit};

/// Request body for proposing an edit to someone else's blog.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateSuggestionRequest {
    #[schema(example = 1)]
    pub blog_id: i32,
    pub title: String,
    pub content: String,
    /// Omit to keep the blog's current excerpt.
    pub excerpt: Option<String>,
    /// Note to the author explaining the change.
    pub revision_comment: Option<String>,
}

impl From<CreateSuggestionRequest> for EditDraft {
    fn from(req: CreateSuggestionRequest) -> Self {
        Self {
            title: req.title,
            content: req.content,
            excerpt: req.excerpt,
            revision_comment: req.revision_comment,
        }
    }
}

/// Request body for reviewing a suggestion.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct ReviewSuggestionRequest {
    /// `accepted` or `rejected`.
    pub status: ReviewDecision,
    /// Optional note to the proposer.
    pub comment: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SuggestionResponse {
    pub id: i32,
    pub blog_id: i32,
    pub proposer_id: i32,
    pub original_title: String,
    pub original_content: String,
    pub original_excerpt: String,
    pub suggested_title: String,
    pub suggested_content: String,
    pub suggested_excerpt: String,
    pub revision_comment: Option<String>,
    pub status: ProposalStatus,
    pub decided_at: Option<DateTime<Utc>>,
    pub review_comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<crate::entity::edit_proposal::Model> for SuggestionResponse {
    fn from(m: crate::entity::edit_proposal::Model) -> Self {
        Self {
            id: m.id,
            blog_id: m.blog_id,
            proposer_id: m.proposer_id,
            original_title: m.original_title,
            original_content: m.original_content,
            original_excerpt: m.original_excerpt,
            suggested_title: m.suggested_title,
            suggested_content: m.suggested_content,
            suggested_excerpt: m.suggested_excerpt,
            revision_comment: m.revision_comment,
            status: m.status,
            decided_at: m.decided_at,
            review_comment: m.review_comment,
            created_at: m.created_at,
        }
    }
}

/// A pending suggestion on one of the caller's blogs, with display context.
#[derive(Serialize, utoipa::ToSchema)]
pub struct PendingEditResponse {
    pub proposal: SuggestionResponse,
    pub blog_title: String,
    pub proposer_name: String,
}

impl From<PendingEdit> for PendingEditResponse {
    fn from(p: PendingEdit) -> Self {
        Self {
            proposal: p.proposal.into(),
            blog_title: p.blog_title,
            proposer_name: p.proposer_name,
        }
    }
}
