//! Ownership rules. Pure functions over already-loaded rows.

use crate::entity::{blog, comment, edit_proposal};

/// The authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub id: i32,
}

impl Principal {
    pub fn new(id: i32) -> Self {
        Self { id }
    }
}

/// Only the author may overwrite or delete a blog.
pub fn can_mutate_blog(principal: Principal, blog: &blog::Model) -> bool {
    blog.author_id == principal.id
}

/// Only the author of the target blog may accept or reject edits to it.
/// The proposer has no say, even if they are also an admin elsewhere.
pub fn can_decide_proposal(principal: Principal, blog: &blog::Model) -> bool {
    can_mutate_blog(principal, blog)
}

pub fn can_view_proposal(
    principal: Principal,
    proposal: &edit_proposal::Model,
    blog: &blog::Model,
) -> bool {
    proposal.proposer_id == principal.id || can_mutate_blog(principal, blog)
}

/// Comment authors edit their own comments. Blog authors moderate theirs.
pub fn can_mutate_comment(
    principal: Principal,
    comment: &comment::Model,
    blog: &blog::Model,
) -> bool {
    comment.author_id == principal.id || can_mutate_blog(principal, blog)
}

/// Published blogs are public. Drafts are visible to their author only.
pub fn can_view_blog(principal: Option<Principal>, blog: &blog::Model) -> bool {
    blog.status.is_published() || principal.is_some_and(|p| can_mutate_blog(p, blog))
}
