//! The closed set of rules a pull request is checked against.
//!
//! Variant order is significant: it is the order rules are reported in,
//! grouped by [`ErrorCategory`].

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ErrorCategory {
    #[serde(rename = "fileErrors")]
    File,
    #[serde(rename = "headerErrors")]
    Header,
    #[serde(rename = "approvalErrors")]
    Approval,
    #[serde(rename = "authorErrors")]
    Author,
}

impl ErrorCategory {
    pub const ALL: [ErrorCategory; 4] = [Self::File, Self::Header, Self::Approval, Self::Author];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::File => "fileErrors",
            Self::Header => "headerErrors",
            Self::Approval => "approvalErrors",
            Self::Author => "authorErrors",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RuleId {
    #[serde(rename = "filePreexistingError")]
    FilePreexisting,
    #[serde(rename = "validFilenameError")]
    ValidFilename,
    #[serde(rename = "matchingEIPNumError")]
    MatchingEipNum,
    #[serde(rename = "constantEIPNumError")]
    ConstantEipNum,
    #[serde(rename = "constantStatusError")]
    ConstantStatus,
    #[serde(rename = "validStatusError")]
    ValidStatus,
    #[serde(rename = "isEditorApprovedError")]
    IsEditorApproved,
    #[serde(rename = "enoughEditorApprovalsForEIP1Error")]
    EnoughEditorApprovalsForEip1,
    #[serde(rename = "isAuthorApprovedError")]
    IsAuthorApproved,
    #[serde(rename = "hasAuthorsError")]
    HasAuthors,
}

impl RuleId {
    pub const ALL: [RuleId; 10] = [
        Self::FilePreexisting,
        Self::ValidFilename,
        Self::MatchingEipNum,
        Self::ConstantEipNum,
        Self::ConstantStatus,
        Self::ValidStatus,
        Self::IsEditorApproved,
        Self::EnoughEditorApprovalsForEip1,
        Self::IsAuthorApproved,
        Self::HasAuthors,
    ];

    pub fn category(self) -> ErrorCategory {
        match self {
            Self::FilePreexisting | Self::ValidFilename => ErrorCategory::File,
            Self::MatchingEipNum
            | Self::ConstantEipNum
            | Self::ConstantStatus
            | Self::ValidStatus => ErrorCategory::Header,
            Self::IsEditorApproved
            | Self::EnoughEditorApprovalsForEip1
            | Self::IsAuthorApproved => ErrorCategory::Approval,
            Self::HasAuthors => ErrorCategory::Author,
        }
    }

    /// Report key, e.g. `constantStatusError`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FilePreexisting => "filePreexistingError",
            Self::ValidFilename => "validFilenameError",
            Self::MatchingEipNum => "matchingEIPNumError",
            Self::ConstantEipNum => "constantEIPNumError",
            Self::ConstantStatus => "constantStatusError",
            Self::ValidStatus => "validStatusError",
            Self::IsEditorApproved => "isEditorApprovedError",
            Self::EnoughEditorApprovalsForEip1 => "enoughEditorApprovalsForEIP1Error",
            Self::IsAuthorApproved => "isAuthorApprovedError",
            Self::HasAuthors => "hasAuthorsError",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
