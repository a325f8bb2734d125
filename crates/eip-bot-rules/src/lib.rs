//! Rule evaluation for EIP pull requests.
//!
//! - [`assertions`]: independent checks, each yielding a violation or nothing
//! - [`aggregate`]: runs the checks in order into a raw [`TestResults`]
//! - [`purifiers`]: compensating conditions that clear raw violations
//! - [`purify`]: applies purifiers to produce the final report
//! - [`mentions`]: who to ping about what is left
//! - [`pipeline`]: the whole run against a [`PullRequestHost`]
//!
//! [`TestResults`]: eip_bot_core::TestResults
//! [`PullRequestHost`]: eip_bot_core::PullRequestHost

pub mod aggregate;
pub mod assertions;
pub mod mentions;
pub mod pipeline;
pub mod purifiers;
pub mod purify;

#[cfg(any(test, feature = "test-util"))]
pub mod mock;

pub use aggregate::test_file;
pub use mentions::{get_mentions, reviewer_handles, MENTIONS_SEPARATOR};
pub use pipeline::check_pull_request;
pub use purifiers::{default_purifiers, Purifier};
pub use purify::purify;
