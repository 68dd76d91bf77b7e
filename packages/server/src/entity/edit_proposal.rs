use blogcollab_common::ProposalStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A suggested change to a blog by someone other than its author.
///
/// Everything except `status`, `decided_at` and `review_comment` is written
/// once at creation. The decision fields are written once, by the
/// conditional update that moves the row out of `pending`.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "edit_proposal")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(indexed)]
    pub blog_id: i32,
    #[sea_orm(belongs_to, from = "blog_id", to = "id")]
    pub blog: HasOne<super::blog::Entity>,

    #[sea_orm(indexed)]
    pub proposer_id: i32,
    #[sea_orm(belongs_to, from = "proposer_id", to = "id")]
    pub proposer: HasOne<super::user::Entity>,

    /// Snapshot of the blog at proposal time, kept for diff display.
    pub original_title: String,
    #[sea_orm(column_type = "Text")]
    pub original_content: String,
    #[sea_orm(column_type = "Text")]
    pub original_excerpt: String,

    pub suggested_title: String,
    #[sea_orm(column_type = "Text")]
    pub suggested_content: String,
    #[sea_orm(column_type = "Text")]
    pub suggested_excerpt: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub revision_comment: Option<String>,

    #[sea_orm(indexed)]
    pub status: ProposalStatus,
    pub decided_at: Option<DateTimeUtc>,
    #[sea_orm(column_type = "Text", nullable)]
    pub review_comment: Option<String>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
