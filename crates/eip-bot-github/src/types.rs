//! Wire shapes of the GitHub REST responses the bot reads.

use std::collections::BTreeSet;

use eip_bot_core::{Handle, PullRequest};
use serde::Deserialize;

use crate::comment::is_bot_comment;

#[derive(Clone, Debug, Deserialize)]
pub struct UserRef {
    pub login: String,
    /// `User`, `Bot` or `Organization`.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

impl UserRef {
    pub fn is_bot(&self) -> bool {
        self.kind.as_deref() == Some("Bot")
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct CommitRef {
    pub sha: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PullResponse {
    pub number: u64,
    #[serde(default)]
    pub merged: bool,
    #[serde(default)]
    pub changed_files: u64,
    pub user: UserRef,
    pub base: CommitRef,
    pub head: CommitRef,
}

impl From<PullResponse> for PullRequest {
    fn from(pull: PullResponse) -> Self {
        Self {
            number: pull.number,
            merged: pull.merged,
            changed_files: pull.changed_files,
            author: Handle::new(format!("@{}", pull.user.login)),
            base_sha: pull.base.sha,
            head_sha: pull.head.sha,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ReviewResponse {
    /// `null` for deleted accounts.
    pub user: Option<UserRef>,
    pub state: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CommentResponse {
    pub id: u64,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub user: Option<UserRef>,
}

impl CommentResponse {
    /// Posted by a bot account and carrying the marker. Humans quoting the
    /// marker do not get their comment overwritten.
    pub fn is_bot_comment(&self) -> bool {
        self.user.as_ref().is_some_and(UserRef::is_bot)
            && self.body.as_deref().is_some_and(is_bot_comment)
    }
}

/// Users whose most recent approving-or-blocking review is an approval.
///
/// Reviews arrive oldest first. An approval on an older commit still counts;
/// a later change request or dismissal revokes it; plain comments do not
/// affect it.
pub fn latest_approvals(reviews: &[ReviewResponse]) -> BTreeSet<Handle> {
    let mut approved = BTreeSet::new();
    for review in reviews {
        let Some(user) = &review.user else {
            continue;
        };
        let handle = Handle::new(format!("@{}", user.login));
        match review.state.as_str() {
            "APPROVED" => {
                let _ = approved.insert(handle);
            }
            "CHANGES_REQUESTED" | "DISMISSED" => {
                let _ = approved.remove(&handle);
            }
            _ => {}
        }
    }
    approved
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(login: &str, state: &str) -> ReviewResponse {
        ReviewResponse {
            user: Some(UserRef {
                login: login.into(),
                kind: Some("User".into()),
            }),
            state: state.into(),
        }
    }

    #[test]
    fn latest_review_wins() {
        let reviews = vec![
            review("alice", "APPROVED"),
            review("bob", "APPROVED"),
            review("bob", "CHANGES_REQUESTED"),
            review("carol", "CHANGES_REQUESTED"),
            review("carol", "APPROVED"),
            review("alice", "COMMENTED"),
        ];
        let approved = latest_approvals(&reviews);
        assert_eq!(
            approved.into_iter().collect::<Vec<_>>(),
            vec![Handle::from("@alice"), Handle::from("@carol")]
        );
    }

    #[test]
    fn dismissal_revokes() {
        let reviews = vec![review("alice", "APPROVED"), review("alice", "DISMISSED")];
        assert!(latest_approvals(&reviews).is_empty());
    }

    #[test]
    fn ghost_reviews_are_skipped() {
        let reviews = vec![ReviewResponse {
            user: None,
            state: "APPROVED".into(),
        }];
        assert!(latest_approvals(&reviews).is_empty());
    }

    #[test]
    fn only_bot_authored_marker_comments_are_ours() {
        let comments: Vec<CommentResponse> = serde_json::from_value(serde_json::json!([
            { "id": 1, "body": "<!-- eip-bot -->\nold", "user": { "login": "github-actions[bot]", "type": "Bot" } },
            { "id": 2, "body": "<!-- eip-bot --> copied", "user": { "login": "mallory", "type": "User" } },
            { "id": 3, "body": "plain", "user": { "login": "dependabot[bot]", "type": "Bot" } },
            { "id": 4, "body": "<!-- eip-bot -->" }
        ]))
        .unwrap();
        let ours: Vec<u64> = comments
            .iter()
            .filter(|c| c.is_bot_comment())
            .map(|c| c.id)
            .collect();
        assert_eq!(ours, vec![1]);
    }

    #[test]
    fn pull_response_conversion() {
        let pull: PullResponse = serde_json::from_value(serde_json::json!({
            "number": 7,
            "merged": false,
            "changed_files": 1,
            "user": { "login": "carol" },
            "base": { "sha": "b1" },
            "head": { "sha": "h1" },
            "title": "ignored"
        }))
        .unwrap();
        let pr: PullRequest = pull.into();
        assert_eq!(pr.author.to_string(), "@carol");
        assert_eq!(pr.head_sha, "h1");
    }
}
