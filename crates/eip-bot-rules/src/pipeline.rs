//! One full check of a pull request: fetch, evaluate, purify, report.

use eip_bot_core::{BotError, PullRequestHost, Verdict};
use tracing::{debug, info, instrument, warn};

use crate::aggregate::test_file;
use crate::mentions::{get_mentions, reviewer_handles};
use crate::purifiers::default_purifiers;
use crate::purify::purify;

/// Check the host's pull request and, when violations remain, ask the
/// relevant people to review and leave a comment listing them.
///
/// Rule violations come back as [`Verdict::Failed`]; `Err` is reserved for
/// infrastructure failures.
#[instrument(skip_all)]
pub async fn check_pull_request(host: &dyn PullRequestHost) -> Result<Verdict, BotError> {
    let pr = host.pull_request().await?;
    if pr.merged {
        return Err(BotError::AlreadyMerged(pr.number));
    }

    let mut files = host.changed_files().await?;
    if files.is_empty() {
        return Err(BotError::NoFiles(pr.number));
    }
    if pr.changed_files != 1 || files.len() != 1 {
        return Err(BotError::MultipleFiles {
            changed: pr.changed_files.max(files.len() as u64),
        });
    }
    let file = files.remove(0);

    let dirty = test_file(host, &file).await?;
    if let Ok(raw) = serde_json::to_string(&dirty.errors) {
        debug!(pull_number = pr.number, report = %raw, "raw report");
    }
    let results = purify(dirty, default_purifiers());

    let messages = results.errors.messages();
    if messages.is_empty() {
        info!(pull_number = pr.number, file = %file.filename, "passed!");
        return Ok(Verdict::Passed);
    }

    let mentions = get_mentions(&results, host.editors());
    let reviewers = reviewer_handles(&mentions, &pr.author);
    if reviewers.is_empty() {
        debug!("no reviewers to request");
    } else {
        host.request_reviewers(&reviewers).await?;
    }
    let mentions_arg = (!mentions.is_empty()).then_some(mentions.as_str());
    host.post_comment(&messages, mentions_arg).await?;

    warn!(
        pull_number = pr.number,
        violations = messages.len(),
        "failed to pass tests with the following errors:\n\t- {}",
        messages.join("\n\t- ")
    );
    Ok(Verdict::Failed { messages, mentions })
}
