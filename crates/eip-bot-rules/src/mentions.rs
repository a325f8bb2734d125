//! Who gets pinged about the violations left after purification.

use std::collections::BTreeSet;

use eip_bot_core::{Handle, RuleId, TestResults};

pub const MENTIONS_SEPARATOR: &str = " ";

fn join(handles: &[Handle]) -> Option<String> {
    let joined = handles
        .iter()
        .filter(|h| !h.is_empty())
        .map(Handle::to_string)
        .collect::<Vec<_>>()
        .join(MENTIONS_SEPARATOR);
    (!joined.is_empty()).then_some(joined)
}

/// Editors are needed for unapproved new files, EIP-1 changes short of
/// approvals, and invalid statuses without editor approval.
pub fn editor_mentions(results: &TestResults, editors: &[Handle]) -> Option<String> {
    let errors = &results.errors;
    let editor_unapproved = errors.is_violated(RuleId::IsEditorApproved);

    let new_file = errors.is_violated(RuleId::FilePreexisting) && editor_unapproved;
    let eip1 = errors.is_violated(RuleId::EnoughEditorApprovalsForEip1);
    let invalid_status = errors.is_violated(RuleId::ValidStatus) && editor_unapproved;

    if new_file || eip1 || invalid_status {
        join(editors)
    } else {
        None
    }
}

pub fn author_mentions(results: &TestResults) -> Option<String> {
    match &results.authors {
        Some(authors) if results.errors.is_violated(RuleId::IsAuthorApproved) => join(authors),
        _ => None,
    }
}

/// Editor mentions followed by author mentions, space-separated. Empty when
/// nobody needs to look.
pub fn get_mentions(results: &TestResults, editors: &[Handle]) -> String {
    [editor_mentions(results, editors), author_mentions(results)]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(MENTIONS_SEPARATOR)
}

/// Handles to request reviews from: deduplicated, in mention order, without
/// the PR author (who cannot review their own pull request).
pub fn reviewer_handles(mentions: &str, pr_author: &Handle) -> Vec<Handle> {
    let mut seen = BTreeSet::new();
    mentions
        .split(MENTIONS_SEPARATOR)
        .map(Handle::from)
        .filter(|h| !h.is_empty() && h != pr_author)
        .filter(|h| seen.insert(h.clone()))
        .collect()
}
