pub mod diff;
pub mod errors;
pub mod handle;
pub mod host;
pub mod pull;
pub mod report;
pub mod rules;

pub use diff::{filename_eip_number, is_eip_path, FileDiff, FormattedFile, EIP_DIRECTORY};
pub use errors::{BotError, HostError};
pub use handle::Handle;
pub use host::PullRequestHost;
pub use pull::{Approvals, FileStatus, PrFile, Preexistence, PullRequest};
pub use report::{Clearance, ErrorReport, TestResults, Verdict, Violation};
pub use rules::{ErrorCategory, RuleId};
