use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::handle::Handle;

/// The pull request under test.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub merged: bool,
    /// Changed-file count as reported by the host, independent of the file
    /// listing (which may be truncated).
    pub changed_files: u64,
    pub author: Handle,
    pub base_sha: String,
    pub head_sha: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Added,
    Modified,
    Removed,
    Renamed,
    Copied,
    Changed,
    Unchanged,
}

/// One entry of a pull request's file listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrFile {
    pub filename: String,
    pub status: FileStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_filename: Option<String>,
    /// Unified patch text, absent for binary or very large changes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<String>,
}

impl PrFile {
    /// Path of the file on the base branch.
    pub fn base_filename(&self) -> &str {
        self.previous_filename.as_deref().unwrap_or(&self.filename)
    }
}

/// Outcome of asking whether the changed file existed before the PR.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Preexistence {
    Existing(PrFile),
    New { reason: String },
}

/// Who has signed off on the pull request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Approvals {
    pub pr_author: Option<Handle>,
    /// Users whose latest review is an approval.
    pub reviewers: BTreeSet<Handle>,
}

impl Approvals {
    /// Reviewers that appear in `among`.
    pub fn reviewers_among<'a>(&'a self, among: &'a [Handle]) -> impl Iterator<Item = &'a Handle> {
        among.iter().filter(|h| self.reviewers.contains(h))
    }
}
