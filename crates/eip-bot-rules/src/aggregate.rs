//! Runs the assertions in their fixed order and folds the outcomes into a
//! raw [`TestResults`].

use eip_bot_core::{
    ErrorReport, FileDiff, Handle, HostError, PrFile, Preexistence, PullRequestHost, RuleId,
    TestResults, Violation,
};
use tracing::{debug, instrument};

use crate::assertions;

/// Evaluate every rule against `file`.
///
/// Two branches end early:
/// - a new file an editor already approved is accepted as-is;
/// - a file without authors skips the author-approval check, leaving
///   `authors` unset and `isAuthorApprovedError` unevaluated.
///
/// A new file without editor approval goes through the full rule set so the
/// report lists everything that is wrong with it.
#[instrument(skip_all, fields(file = %file.filename))]
pub async fn test_file(
    host: &dyn PullRequestHost,
    file: &PrFile,
) -> Result<TestResults, HostError> {
    let file_diff = host.file_diff(file).await?;
    let mut errors = ErrorReport::new();

    let editor_approval = match host.require_file_preexisting(file).await? {
        Preexistence::Existing(_) => assertions::is_editor_approved_error(&file_diff, host).await?,
        Preexistence::New { reason } => {
            debug!(%reason, "file is new");
            errors = errors.record(RuleId::FilePreexisting, Some(Violation::new(reason)));
            let outcome = assertions::is_editor_approved_error(&file_diff, host).await?;
            if outcome.is_none() {
                debug!("new file approved by an editor");
                return Ok(TestResults {
                    errors: errors.record(RuleId::IsEditorApproved, None),
                    file_diff,
                    authors: None,
                });
            }
            outcome
        }
    };

    let errors = errors
        .record(RuleId::IsEditorApproved, editor_approval)
        .record(
            RuleId::EnoughEditorApprovalsForEip1,
            assertions::enough_editor_approvals_for_eip1_error(&file_diff, host).await?,
        )
        .record(RuleId::ValidFilename, assertions::valid_filename_error(file))
        .record(
            RuleId::MatchingEipNum,
            assertions::matching_eip_num_error(&file_diff),
        )
        .record(
            RuleId::ConstantEipNum,
            assertions::constant_eip_num_error(&file_diff),
        )
        .record(
            RuleId::ConstantStatus,
            assertions::constant_status_error(&file_diff),
        )
        .record(RuleId::ValidStatus, assertions::valid_status_error(&file_diff));

    let has_authors = assertions::has_authors_error(&file_diff);
    let no_authors = has_authors.is_some();
    let errors = errors.record(RuleId::HasAuthors, has_authors);
    if no_authors {
        debug!("no authors, skipping author approval");
        return Ok(TestResults {
            errors,
            file_diff,
            authors: None,
        });
    }

    let errors = errors.record(
        RuleId::IsAuthorApproved,
        assertions::is_author_approved_error(&file_diff, host).await?,
    );
    let authors = Some(require_authors(&file_diff));
    Ok(TestResults {
        errors,
        file_diff,
        authors,
    })
}

fn require_authors(diff: &FileDiff) -> Vec<Handle> {
    diff.approving_authors().to_vec()
}
