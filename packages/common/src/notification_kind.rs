#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ParseEnumError;

/// What caused a notification to be created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Sent to a blog's author when someone proposes an edit.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "edit_proposed"))]
    EditProposed,
    /// Sent to the proposer when the author accepts their edit.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "edit_accepted"))]
    EditAccepted,
    /// Sent to the proposer when the author rejects their edit.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "edit_rejected"))]
    EditRejected,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "system"))]
    System,
}

impl NotificationKind {
    const NAMES: &'static [&'static str] =
        &["edit_proposed", "edit_accepted", "edit_rejected", "system"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EditProposed => "edit_proposed",
            Self::EditAccepted => "edit_accepted",
            Self::EditRejected => "edit_rejected",
            Self::System => "system",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "edit_proposed" => Ok(Self::EditProposed),
            "edit_accepted" => Ok(Self::EditAccepted),
            "edit_rejected" => Ok(Self::EditRejected),
            "system" => Ok(Self::System),
            _ => Err(ParseEnumError::new("notification type", s, Self::NAMES)),
        }
    }
}
