//! GitHub-backed collaborators for the rule pipeline.

pub mod client;
pub mod comment;
pub mod event;
pub mod host;
pub mod patch;
pub mod preamble;
pub mod types;

pub use client::GitHubClient;
pub use event::{require_event, require_pull_number};
pub use host::GitHubHost;
