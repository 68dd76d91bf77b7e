use blogcollab_common::NotificationKind;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Serialize, utoipa::ToSchema)]
pub struct NotificationResponse {
    pub id: i32,
    pub user_id: i32,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub message: String,
    /// Proposal id for `edit_proposed`, blog id for decisions.
    pub related_id: Option<i32>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<crate::entity::notification::Model> for NotificationResponse {
    fn from(m: crate::entity::notification::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            kind: m.kind,
            message: m.message,
            related_id: m.related_id,
            is_read: m.is_read,
            created_at: m.created_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UnreadCountResponse {
    #[schema(example = 3)]
    pub count: u64,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct MarkAllReadResponse {
    /// Number of notifications that were unread before the call.
    pub updated: u64,
}
