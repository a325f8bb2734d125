//! The seam between the rule pipeline and the code-hosting service.

use async_trait::async_trait;

use crate::diff::FileDiff;
use crate::errors::HostError;
use crate::handle::Handle;
use crate::pull::{Approvals, PrFile, Preexistence, PullRequest};

/// Access to the single pull request being checked.
///
/// Implementations are bound to one pull request at construction time.
#[async_trait]
pub trait PullRequestHost: Send + Sync {
    async fn pull_request(&self) -> Result<PullRequest, HostError>;

    async fn changed_files(&self) -> Result<Vec<PrFile>, HostError>;

    /// Before/after preambles and changed lines of `file`.
    async fn file_diff(&self, file: &PrFile) -> Result<FileDiff, HostError>;

    /// Whether `file` existed before the pull request. A new file is an
    /// expected outcome, not an error.
    async fn require_file_preexisting(&self, file: &PrFile) -> Result<Preexistence, HostError>;

    async fn approvals(&self) -> Result<Approvals, HostError>;

    /// Editors, in configured order.
    fn editors(&self) -> &[Handle];

    async fn post_comment(&self, messages: &[String], mentions: Option<&str>)
        -> Result<(), HostError>;

    async fn request_reviewers(&self, handles: &[Handle]) -> Result<(), HostError>;
}
