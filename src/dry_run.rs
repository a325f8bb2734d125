use async_trait::async_trait;
use eip_bot_core::{
    Approvals, FileDiff, Handle, HostError, PrFile, Preexistence, PullRequest, PullRequestHost,
};
use tracing::info;

/// Forwards reads to the wrapped host and logs writes instead of performing them.
pub struct DryRunHost<H> {
    inner: H,
}

impl<H: PullRequestHost> DryRunHost<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<H: PullRequestHost> PullRequestHost for DryRunHost<H> {
    async fn pull_request(&self) -> Result<PullRequest, HostError> {
        self.inner.pull_request().await
    }

    async fn changed_files(&self) -> Result<Vec<PrFile>, HostError> {
        self.inner.changed_files().await
    }

    async fn file_diff(&self, file: &PrFile) -> Result<FileDiff, HostError> {
        self.inner.file_diff(file).await
    }

    async fn require_file_preexisting(&self, file: &PrFile) -> Result<Preexistence, HostError> {
        self.inner.require_file_preexisting(file).await
    }

    async fn approvals(&self) -> Result<Approvals, HostError> {
        self.inner.approvals().await
    }

    fn editors(&self) -> &[Handle] {
        self.inner.editors()
    }

    async fn post_comment(
        &self,
        messages: &[String],
        mentions: Option<&str>,
    ) -> Result<(), HostError> {
        info!(?messages, ?mentions, "dry run: skipping comment");
        Ok(())
    }

    async fn request_reviewers(&self, handles: &[Handle]) -> Result<(), HostError> {
        info!(reviewers = ?handles, "dry run: skipping reviewer request");
        Ok(())
    }
}
