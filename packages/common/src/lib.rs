pub mod blog_status;
pub mod notification_kind;
pub mod proposal_status;

use std::fmt;

pub use blog_status::BlogStatus;
pub use notification_kind::NotificationKind;
pub use proposal_status::{ProposalStatus, ReviewDecision};

/// Error when parsing an unknown enum string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    kind: &'static str,
    invalid: String,
    valid: &'static [&'static str],
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, invalid: &str, valid: &'static [&'static str]) -> Self {
        Self {
            kind,
            invalid: invalid.to_string(),
            valid,
        }
    }
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid {} '{}'. Valid values: {}",
            self.kind,
            self.invalid,
            self.valid.join(", ")
        )
    }
}

impl std::error::Error for ParseEnumError {}
