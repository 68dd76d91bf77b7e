#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{NotificationKind, ParseEnumError};

/// Review state of an edit proposal.
///
/// `Pending` is the only state with outgoing transitions. `Accepted` and
/// `Rejected` are terminal.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    /// Waiting for the blog author to review.
    #[default]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "pending"))]
    Pending,
    /// Merged into the blog.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "accepted"))]
    Accepted,
    /// Declined; the blog was left untouched.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "rejected"))]
    Rejected,
}

impl ProposalStatus {
    const NAMES: &'static [&'static str] = &["pending", "accepted", "rejected"];

    /// Returns true once a decision has been recorded.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProposalStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            _ => Err(ParseEnumError::new("proposal status", s, Self::NAMES)),
        }
    }
}

/// The blog author's verdict on a pending proposal.
///
/// Serialized with the status names so a review request reads
/// `{"status": "accepted"}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
pub enum ReviewDecision {
    #[serde(rename = "accepted", alias = "accept")]
    Accept,
    #[serde(rename = "rejected", alias = "reject")]
    Reject,
}

impl ReviewDecision {
    /// The terminal status this decision moves a proposal into.
    pub fn target_status(&self) -> ProposalStatus {
        match self {
            Self::Accept => ProposalStatus::Accepted,
            Self::Reject => ProposalStatus::Rejected,
        }
    }

    /// The notification sent to the proposer for this decision.
    pub fn notification_kind(&self) -> NotificationKind {
        match self {
            Self::Accept => NotificationKind::EditAccepted,
            Self::Reject => NotificationKind::EditRejected,
        }
    }
}
