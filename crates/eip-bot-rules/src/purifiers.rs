//! Compensating conditions that make raw violations moot.
//!
//! Every purifier reads the raw results and names the rules it clears. None
//! of them can introduce a violation.

use eip_bot_core::{Clearance, RuleId, TestResults};

pub type Purifier = fn(&TestResults) -> Clearance;

const DEFAULT_PURIFIERS: &[Purifier] = &[
    status_change_allowed_purifier,
    editor_approval_purifier,
    eip1_purifier,
];

/// The purifiers every run applies.
pub fn default_purifiers() -> &'static [Purifier] {
    DEFAULT_PURIFIERS
}

/// Status changes are editor-gated rather than forbidden.
pub fn status_change_allowed_purifier(results: &TestResults) -> Clearance {
    let errors = &results.errors;
    Clearance::none().clear_if(
        errors.is_violated(RuleId::ConstantStatus) && errors.passed(RuleId::IsEditorApproved),
        RuleId::ConstantStatus,
    )
}

/// Editor approval is only mandatory for new files, status changes, invalid
/// statuses and EIP-1. When an editor did approve, it also stands in for the
/// new-file, status and author sign-offs.
pub fn editor_approval_purifier(results: &TestResults) -> Clearance {
    let errors = &results.errors;
    if errors.passed(RuleId::IsEditorApproved) {
        return Clearance::none()
            .clear(RuleId::FilePreexisting)
            .clear(RuleId::ValidStatus)
            .clear(RuleId::IsAuthorApproved);
    }

    let editor_required = errors.is_violated(RuleId::FilePreexisting)
        || errors.is_violated(RuleId::ConstantStatus)
        || errors.is_violated(RuleId::ValidStatus)
        || results.file_diff.is_eip1();
    Clearance::none().clear_if(!editor_required, RuleId::IsEditorApproved)
}

/// The EIP-1 approval count is irrelevant everywhere else.
pub fn eip1_purifier(results: &TestResults) -> Clearance {
    Clearance::none().clear_if(
        !results.file_diff.is_eip1(),
        RuleId::EnoughEditorApprovalsForEip1,
    )
}
