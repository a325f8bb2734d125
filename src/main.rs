//! # eip-bot
//!
//! Checks an EIP pull request, comments on failures and requests reviewers.

#![deny(unsafe_code)]

mod cli;
mod dry_run;
mod outcome;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use eip_bot_core::{BotError, PullRequestHost, Verdict};
use eip_bot_github::{require_event, require_pull_number, GitHubClient, GitHubHost};
use eip_bot_rules::check_pull_request;
use eip_bot_settings::Settings;
use eip_bot_telemetry::{init_telemetry, TelemetryConfig};
use tracing::{error, info, warn};

use crate::cli::{CheckArgs, Cli, Command};
use crate::dry_run::DryRunHost;
use crate::outcome::{annotate_failure, exit_status, failure_summary, EXIT_INFRA_FAILURE};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.command {
        Command::Check(args) => match check(&args).await {
            Ok(code) => code,
            Err(err) => {
                error!(error = %format!("{err:#}"), "check aborted");
                eprintln!("eip-bot: {err:#}");
                annotate_failure(&format!("{err:#}"));
                ExitCode::from(EXIT_INFRA_FAILURE)
            }
        },
    }
}

async fn check(args: &CheckArgs) -> Result<ExitCode> {
    let settings = eip_bot_settings::load(args.config.as_deref(), &args.overrides())
        .context("failed to load settings")?;

    let telemetry = TelemetryConfig::new(&settings.log_level, settings.log_format)?;
    if let Err(e) = init_telemetry(&telemetry) {
        eprintln!("eip-bot: {e}");
    }

    require_event(settings.event_name.as_deref())?;
    let pull_number = require_pull_number(settings.pull_number, settings.event_path.as_deref())?;
    info!(
        repo = %settings.repository,
        pull_number,
        dry_run = settings.dry_run,
        "checking pull request"
    );

    let host = github_host(&settings, pull_number)?;
    if settings.dry_run {
        run(&DryRunHost::new(host)).await
    } else {
        run(&host).await
    }
}

fn github_host(settings: &Settings, pull_number: u64) -> Result<GitHubHost> {
    let client = GitHubClient::new(
        &settings.api_url,
        &settings.repository,
        settings.token.clone(),
    )
    .context("failed to build GitHub client")?;
    Ok(GitHubHost::new(client, pull_number, settings.editors.clone()))
}

async fn run(host: &dyn PullRequestHost) -> Result<ExitCode> {
    match check_pull_request(host).await {
        Ok(verdict) => {
            if let Verdict::Failed { messages, .. } = &verdict {
                annotate_failure(&failure_summary(messages));
            }
            Ok(ExitCode::from(exit_status(&verdict)))
        }
        Err(err) => {
            error!(error = %err, error_kind = err.error_kind(), "check failed");
            report_to_pull_request(host, &err).await;
            Err(err.into())
        }
    }
}

/// Best effort. A failed post is only logged.
async fn report_to_pull_request(host: &dyn PullRequestHost, err: &BotError) {
    if let Err(post_err) = host.post_comment(&[err.to_string()], None).await {
        warn!(
            error = %post_err,
            error_kind = post_err.error_kind(),
            "failed to post error comment"
        );
    }
}
