//! Workflow event requirements: the bot only runs on pull request events.

use std::path::Path;

use eip_bot_core::BotError;
use serde::Deserialize;

pub const SUPPORTED_EVENTS: &[&str] = &["pull_request", "pull_request_target"];

#[derive(Debug, Deserialize)]
struct PullRef {
    number: u64,
}

#[derive(Debug, Deserialize)]
struct EventPayload {
    #[serde(default)]
    pull_request: Option<PullRef>,
    #[serde(default)]
    number: Option<u64>,
}

pub fn require_event(event_name: Option<&str>) -> Result<(), BotError> {
    match event_name {
        Some(name) if SUPPORTED_EVENTS.contains(&name) => Ok(()),
        Some(name) => Err(BotError::UnsupportedEvent(name.to_owned())),
        None => Err(BotError::MissingEvent),
    }
}

/// Pull request number from the event payload file.
pub fn pull_number_from_payload(path: &Path) -> Result<Option<u64>, BotError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        BotError::Config(format!("failed to read event payload {}: {e}", path.display()))
    })?;
    let payload: EventPayload = serde_json::from_str(&content).map_err(|e| {
        BotError::Config(format!("failed to parse event payload {}: {e}", path.display()))
    })?;
    Ok(payload.pull_request.map(|pr| pr.number).or(payload.number))
}

/// An explicit number wins over the one in the event payload.
pub fn require_pull_number(
    explicit: Option<u64>,
    event_path: Option<&Path>,
) -> Result<u64, BotError> {
    if let Some(number) = explicit {
        return Ok(number);
    }
    match event_path {
        Some(path) => pull_number_from_payload(path)?.ok_or(BotError::MissingPullNumber),
        None => Err(BotError::MissingPullNumber),
    }
}
