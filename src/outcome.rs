use eip_bot_core::Verdict;

pub const EXIT_PASSED: u8 = 0;
pub const EXIT_RULE_FAILURE: u8 = 1;
pub const EXIT_INFRA_FAILURE: u8 = 2;

pub fn exit_status(verdict: &Verdict) -> u8 {
    match verdict {
        Verdict::Passed => EXIT_PASSED,
        Verdict::Failed { .. } => EXIT_RULE_FAILURE,
    }
}

pub fn failure_summary(messages: &[String]) -> String {
    format!(
        "failed to pass tests with the following errors:\n\t- {}",
        messages.join("\n\t- ")
    )
}

/// A workflow command that marks the run as failed in the Actions UI.
pub fn workflow_error(message: &str) -> String {
    let escaped = message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A");
    format!("::error::{escaped}")
}

pub fn in_github_actions() -> bool {
    std::env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true")
}

/// Emitted on stdout, where the runner reads workflow commands.
pub fn annotate_failure(message: &str) {
    if in_github_actions() {
        println!("{}", workflow_error(message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_verdict() {
        assert_eq!(exit_status(&Verdict::Passed), EXIT_PASSED);
        let failed = Verdict::Failed {
            messages: vec!["x".into()],
            mentions: String::new(),
        };
        assert_eq!(exit_status(&failed), EXIT_RULE_FAILURE);
    }

    #[test]
    fn summary_lists_each_message() {
        let summary = failure_summary(&["first".into(), "second".into()]);
        assert_eq!(
            summary,
            "failed to pass tests with the following errors:\n\t- first\n\t- second"
        );
    }

    #[test]
    fn workflow_error_escapes_newlines() {
        assert_eq!(
            workflow_error("50% done\nnext\r"),
            "::error::50%25 done%0Anext%0D"
        );
    }
}
