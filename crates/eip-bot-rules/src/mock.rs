//! In-memory [`PullRequestHost`] for deterministic tests without API calls.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use eip_bot_core::{
    Approvals, FileDiff, FileStatus, FormattedFile, Handle, HostError, PrFile, Preexistence,
    PullRequest, PullRequestHost,
};

/// A comment the pipeline asked the host to post.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostedComment {
    pub messages: Vec<String>,
    pub mentions: Option<String>,
}

/// Pre-programmed host state plus a record of every side effect.
pub struct MockHost {
    pull: PullRequest,
    files: Vec<PrFile>,
    diff: FileDiff,
    approvals: Approvals,
    editors: Vec<Handle>,
    approvals_error: Option<HostError>,
    comments: Mutex<Vec<PostedComment>>,
    reviewer_requests: Mutex<Vec<Vec<Handle>>>,
    approval_calls: AtomicUsize,
}

impl MockHost {
    /// Host for PR #42 by `@carol` touching exactly the file in `diff`.
    pub fn new(diff: FileDiff) -> Self {
        let status = if diff.base.is_some() {
            FileStatus::Modified
        } else {
            FileStatus::Added
        };
        let file = PrFile {
            filename: diff.path.clone(),
            status,
            previous_filename: None,
            patch: None,
        };
        let author = Handle::from("@carol");
        Self {
            pull: PullRequest {
                number: 42,
                merged: false,
                changed_files: 1,
                author: author.clone(),
                base_sha: "base".into(),
                head_sha: "head".into(),
            },
            files: vec![file],
            diff,
            approvals: Approvals {
                pr_author: Some(author),
                reviewers: Default::default(),
            },
            editors: vec![Handle::from("@ed1"), Handle::from("@ed2"), Handle::from("@ed3")],
            approvals_error: None,
            comments: Mutex::new(Vec::new()),
            reviewer_requests: Mutex::new(Vec::new()),
            approval_calls: AtomicUsize::new(0),
        }
    }

    pub fn authored_by(mut self, author: &str) -> Self {
        let author = Handle::from(author);
        self.pull.author = author.clone();
        self.approvals.pr_author = Some(author);
        self
    }

    pub fn approved_by(mut self, reviewers: &[&str]) -> Self {
        self.approvals.reviewers = reviewers.iter().copied().map(Handle::from).collect();
        self
    }

    pub fn with_files(mut self, files: Vec<PrFile>) -> Self {
        self.pull.changed_files = files.len() as u64;
        self.files = files;
        self
    }

    pub fn merged(mut self) -> Self {
        self.pull.merged = true;
        self
    }

    pub fn failing_approvals(mut self, error: HostError) -> Self {
        self.approvals_error = Some(error);
        self
    }

    pub fn comments(&self) -> Vec<PostedComment> {
        self.comments.lock().clone()
    }

    pub fn reviewer_requests(&self) -> Vec<Vec<Handle>> {
        self.reviewer_requests.lock().clone()
    }

    pub fn approval_calls(&self) -> usize {
        self.approval_calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl PullRequestHost for MockHost {
    async fn pull_request(&self) -> Result<PullRequest, HostError> {
        Ok(self.pull.clone())
    }

    async fn changed_files(&self) -> Result<Vec<PrFile>, HostError> {
        Ok(self.files.clone())
    }

    async fn file_diff(&self, _file: &PrFile) -> Result<FileDiff, HostError> {
        Ok(self.diff.clone())
    }

    async fn require_file_preexisting(&self, file: &PrFile) -> Result<Preexistence, HostError> {
        if self.diff.base.is_none() {
            return Ok(Preexistence::New {
                reason: format!(
                    "File with name {} is new and new files must be reviewed",
                    file.filename
                ),
            });
        }
        Ok(Preexistence::Existing(file.clone()))
    }

    async fn approvals(&self) -> Result<Approvals, HostError> {
        let _ = self.approval_calls.fetch_add(1, Ordering::Relaxed);
        match &self.approvals_error {
            Some(err) => Err(err.clone()),
            None => Ok(self.approvals.clone()),
        }
    }

    fn editors(&self) -> &[Handle] {
        &self.editors
    }

    async fn post_comment(
        &self,
        messages: &[String],
        mentions: Option<&str>,
    ) -> Result<(), HostError> {
        self.comments.lock().push(PostedComment {
            messages: messages.to_vec(),
            mentions: mentions.map(str::to_owned),
        });
        Ok(())
    }

    async fn request_reviewers(&self, handles: &[Handle]) -> Result<(), HostError> {
        self.reviewer_requests.lock().push(handles.to_vec());
        Ok(())
    }
}

/// Preamble of `EIPS/eip-<num>.md`.
pub fn eip_file(num: u32, status: &str, authors: &[&str]) -> FormattedFile {
    FormattedFile {
        path: format!("EIPS/eip-{num}.md"),
        filename_eip_num: Some(num),
        eip_num: Some(num),
        status: Some(status.to_owned()),
        authors: authors.iter().copied().map(Handle::from).collect(),
    }
}

/// Diff of a pre-existing file moving from `base` to `head`.
pub fn modified(base: FormattedFile, head: FormattedFile) -> FileDiff {
    FileDiff {
        path: head.path.clone(),
        base: Some(base),
        head,
        added_lines: Vec::new(),
        removed_lines: Vec::new(),
    }
}

/// Diff of a file added by the pull request.
pub fn added(head: FormattedFile) -> FileDiff {
    FileDiff {
        path: head.path.clone(),
        base: None,
        head,
        added_lines: Vec::new(),
        removed_lines: Vec::new(),
    }
}
