//! [`PullRequestHost`] backed by the GitHub REST API.

use async_trait::async_trait;
use eip_bot_core::{
    Approvals, FileDiff, FileStatus, FormattedFile, Handle, HostError, PrFile, Preexistence,
    PullRequest, PullRequestHost,
};
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument};

use crate::client::GitHubClient;
use crate::comment::render_comment;
use crate::patch::changed_lines;
use crate::preamble::parse_file;
use crate::types::{latest_approvals, CommentResponse};

pub struct GitHubHost {
    client: GitHubClient,
    pull_number: u64,
    editors: Vec<Handle>,
    pull: OnceCell<PullRequest>,
}

impl GitHubHost {
    pub fn new(client: GitHubClient, pull_number: u64, editors: Vec<Handle>) -> Self {
        Self {
            client,
            pull_number,
            editors,
            pull: OnceCell::new(),
        }
    }

    async fn cached_pull(&self) -> Result<&PullRequest, HostError> {
        self.pull
            .get_or_try_init(|| async {
                let pull = self.client.pull_request(self.pull_number).await?;
                Ok::<_, HostError>(pull.into())
            })
            .await
    }

    async fn formatted(&self, path: &str, git_ref: &str) -> Result<Option<FormattedFile>, HostError> {
        match self.client.file_content(path, git_ref).await? {
            Some(content) => parse_file(path, &content).map(Some),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl PullRequestHost for GitHubHost {
    async fn pull_request(&self) -> Result<PullRequest, HostError> {
        self.cached_pull().await.cloned()
    }

    async fn changed_files(&self) -> Result<Vec<PrFile>, HostError> {
        self.client.pull_files(self.pull_number).await
    }

    #[instrument(skip_all, fields(repo = %self.client.repository(), file = %file.filename))]
    async fn file_diff(&self, file: &PrFile) -> Result<FileDiff, HostError> {
        let pull = self.cached_pull().await?;

        let head = if file.status == FileStatus::Removed {
            None
        } else {
            self.formatted(&file.filename, &pull.head_sha).await?
        };
        let head = match head {
            Some(head) => head,
            None if file.status == FileStatus::Removed => FormattedFile {
                path: file.filename.clone(),
                filename_eip_num: eip_bot_core::filename_eip_number(&file.filename),
                ..FormattedFile::default()
            },
            None => {
                return Err(HostError::NotFound(format!(
                    "{} at {}",
                    file.filename, pull.head_sha
                )))
            }
        };

        let base = if file.status == FileStatus::Added {
            None
        } else {
            match self.formatted(file.base_filename(), &pull.base_sha).await? {
                Some(base) => Some(base),
                None => {
                    return Err(HostError::NotFound(format!(
                        "{} at {}",
                        file.base_filename(),
                        pull.base_sha
                    )))
                }
            }
        };

        let (added_lines, removed_lines) = file
            .patch
            .as_deref()
            .map(changed_lines)
            .unwrap_or_default();
        debug!(
            base_eip = ?base.as_ref().and_then(|b| b.eip_num),
            head_eip = ?head.eip_num,
            added = added_lines.len(),
            removed = removed_lines.len(),
            "file diff"
        );

        Ok(FileDiff {
            path: file.filename.clone(),
            base,
            head,
            added_lines,
            removed_lines,
        })
    }

    async fn require_file_preexisting(&self, file: &PrFile) -> Result<Preexistence, HostError> {
        if file.status == FileStatus::Added {
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
        let pull = self.cached_pull().await?;
        let reviews = self.client.reviews(self.pull_number).await?;
        Ok(Approvals {
            pr_author: Some(pull.author.clone()),
            reviewers: latest_approvals(&reviews),
        })
    }

    fn editors(&self) -> &[Handle] {
        &self.editors
    }

    async fn post_comment(
        &self,
        messages: &[String],
        mentions: Option<&str>,
    ) -> Result<(), HostError> {
        let body = render_comment(messages, mentions);
        let existing = self
            .client
            .issue_comments(self.pull_number)
            .await?
            .into_iter()
            .find(CommentResponse::is_bot_comment);
        match existing {
            Some(comment) => {
                info!(comment_id = comment.id, "updating bot comment");
                self.client.update_comment(comment.id, &body).await
            }
            None => {
                info!(pull_number = self.pull_number, "posting bot comment");
                self.client.create_comment(self.pull_number, &body).await
            }
        }
    }

    async fn request_reviewers(&self, handles: &[Handle]) -> Result<(), HostError> {
        let logins: Vec<String> = handles.iter().map(Handle::login).collect();
        info!(reviewers = ?logins, "requesting reviewers");
        self.client.request_reviewers(self.pull_number, &logins).await
    }
}
