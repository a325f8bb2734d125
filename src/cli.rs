use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use eip_bot_settings::CliOverrides;
use eip_bot_telemetry::LogFormat;

/// Pull request checker for EIP documents.
#[derive(Parser, Debug)]
#[command(name = "eip-bot", version, about = "Validates EIP pull requests")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run every rule against the pull request and report the outcome.
    Check(CheckArgs),
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// JSON config file layered under the environment.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Pull request to check (defaults to the one in the event payload).
    #[arg(long)]
    pub pull_number: Option<u64>,

    /// Read everything but only log the comment and reviewer requests.
    #[arg(long)]
    pub dry_run: bool,

    /// Log output format: text or json.
    #[arg(long)]
    pub log_format: Option<LogFormat>,
}

impl CheckArgs {
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            pull_number: self.pull_number,
            dry_run: self.dry_run,
            log_format: self.log_format,
        }
    }
}
