//! Independent rule checks.
//!
//! Each check returns `None` when the rule holds and a [`Violation`] when it
//! does not. Only the approval checks touch the host; their `Err` is an
//! infrastructure failure, never a rule outcome.

use eip_bot_core::{
    is_eip_path, FileDiff, Handle, HostError, PrFile, PullRequestHost, Violation, EIP_DIRECTORY,
};
use tracing::debug;

/// Statuses a pull request may leave an EIP in without editor sign-off.
pub const ALLOWED_STATUSES: &[&str] = &["draft", "last call", "review"];

/// EIP-1 changes need strictly more than one editor approval.
pub const EIP1_REQUIRED_EDITOR_APPROVALS: usize = 2;

fn join_handles(handles: &[Handle]) -> String {
    handles
        .iter()
        .map(Handle::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn show<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "(missing)".to_owned(), |v| v.to_string())
}

/// Fails unless some editor has an approving review.
pub async fn is_editor_approved_error(
    _diff: &FileDiff,
    host: &dyn PullRequestHost,
) -> Result<Option<Violation>, HostError> {
    let editors = host.editors();
    let approvals = host.approvals().await?;
    if approvals.reviewers_among(editors).next().is_some() {
        return Ok(None);
    }
    Ok(Some(Violation::new(format!(
        "This PR requires review from one of [{}]",
        join_handles(editors)
    ))))
}

/// Only applies to EIP-1, which needs approvals from more than one editor.
pub async fn enough_editor_approvals_for_eip1_error(
    diff: &FileDiff,
    host: &dyn PullRequestHost,
) -> Result<Option<Violation>, HostError> {
    if !diff.is_eip1() {
        return Ok(None);
    }
    let editors = host.editors();
    let approvals = host.approvals().await?;
    let approving: Vec<&Handle> = approvals.reviewers_among(editors).collect();
    debug!(approvals = approving.len(), "EIP-1 editor approvals");
    if approving.len() >= EIP1_REQUIRED_EDITOR_APPROVALS {
        return Ok(None);
    }
    let remaining: Vec<Handle> = editors
        .iter()
        .filter(|e| !approving.contains(e))
        .cloned()
        .collect();
    Ok(Some(Violation::new(format!(
        "Changes to EIP 1 require at least {EIP1_REQUIRED_EDITOR_APPROVALS} unique approvals from editors; there's currently {} approvals; the remaining editors are [{}]",
        approving.len(),
        join_handles(&remaining)
    ))))
}

pub fn valid_filename_error(file: &PrFile) -> Option<Violation> {
    if is_eip_path(&file.filename) {
        return None;
    }
    Some(Violation::new(format!(
        "Filename {} is not in EIP format '{EIP_DIRECTORY}/eip-####.md'",
        file.filename
    )))
}

/// The preamble's `eip` field must match the number in the filename.
pub fn matching_eip_num_error(diff: &FileDiff) -> Option<Violation> {
    let head = &diff.head;
    match (head.eip_num, head.filename_eip_num) {
        (Some(declared), Some(encoded)) if declared == encoded => None,
        (declared, encoded) => Some(Violation::new(format!(
            "EIP number in the preamble of {} ({}) does not match the number in its filename ({})",
            diff.path,
            show(declared),
            show(encoded)
        ))),
    }
}

pub fn constant_eip_num_error(diff: &FileDiff) -> Option<Violation> {
    let base = diff.base.as_ref()?;
    if base.eip_num == diff.head.eip_num {
        return None;
    }
    Some(Violation::new(format!(
        "Base EIP number {} does not match head EIP number {}",
        show(base.eip_num),
        show(diff.head.eip_num)
    )))
}

pub fn constant_status_error(diff: &FileDiff) -> Option<Violation> {
    let base = diff.base.as_ref()?;
    if !diff.status_changed() {
        return None;
    }
    Some(Violation::new(format!(
        "EIP {} state was changed from {} to {}",
        show(diff.head.eip_num),
        show(base.status.as_deref()),
        show(diff.head.status.as_deref())
    )))
}

pub fn valid_status_error(diff: &FileDiff) -> Option<Violation> {
    let status = diff.head.normalized_status();
    if status
        .as_deref()
        .is_some_and(|s| ALLOWED_STATUSES.contains(&s))
    {
        return None;
    }
    Some(Violation::new(format!(
        "{} is in state {} at the head commit, not one of [{}]",
        diff.path,
        show(diff.head.status.as_deref()),
        ALLOWED_STATUSES.join(", ")
    )))
}

pub fn has_authors_error(diff: &FileDiff) -> Option<Violation> {
    if !diff.approving_authors().is_empty() {
        return None;
    }
    let scope = if diff.base.is_some() { "base" } else { "head" };
    Some(Violation::new(format!(
        "{} has no identifiable authors who can approve the PR (only considering the {scope} version)",
        diff.path
    )))
}

/// Passes when the PR author is one of the document's authors, or when a
/// strict majority of the authors approved through reviews.
pub async fn is_author_approved_error(
    diff: &FileDiff,
    host: &dyn PullRequestHost,
) -> Result<Option<Violation>, HostError> {
    let authors = diff.approving_authors();
    let approvals = host.approvals().await?;
    if approvals
        .pr_author
        .as_ref()
        .is_some_and(|author| authors.contains(author))
    {
        return Ok(None);
    }
    let approving = authors
        .iter()
        .filter(|a| approvals.reviewers.contains(*a))
        .count();
    if approving * 2 > authors.len() {
        return Ok(None);
    }
    Ok(Some(Violation::new(format!(
        "{} requires approval from a majority of its authors [{}]; {approving} of {} approved",
        diff.path,
        join_handles(authors),
        authors.len()
    ))))
}
