/// Failures talking to the code-hosting service.
#[derive(Clone, Debug, thiserror::Error)]
pub enum HostError {
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("rate limited: {0}")]
    RateLimited(String),
    #[error("server error {status}: {body}")]
    ServerError { status: u16, body: String },
    #[error("unexpected response {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
    #[error("network error: {0}")]
    NetworkError(String),
    #[error("could not decode response: {0}")]
    Decode(String),
    #[error("could not parse preamble of {path}: {reason}")]
    Preamble { path: String, reason: String },
}

impl HostError {
    /// Classify an HTTP status code into the appropriate error variant.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 if body.to_ascii_lowercase().contains("rate limit") => Self::RateLimited(body),
            401 | 403 => Self::AuthenticationFailed(body),
            404 => Self::NotFound(body),
            429 => Self::RateLimited(body),
            500..=599 => Self::ServerError { status, body },
            _ => Self::UnexpectedStatus { status, body },
        }
    }

    /// Short classification string for logging.
    pub fn error_kind(&self) -> &'static str {
        match self {
            Self::AuthenticationFailed(_) => "authentication_failed",
            Self::NotFound(_) => "not_found",
            Self::RateLimited(_) => "rate_limited",
            Self::ServerError { .. } => "server_error",
            Self::UnexpectedStatus { .. } => "unexpected_status",
            Self::NetworkError(_) => "network_error",
            Self::Decode(_) => "decode",
            Self::Preamble { .. } => "preamble",
        }
    }
}

/// Infrastructure failures that abort a run.
///
/// Rule violations are never reported through this type; they live in the
/// [`ErrorReport`](crate::report::ErrorReport).
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    #[error(transparent)]
    Host(#[from] HostError),

    #[error("unsupported event '{0}', expected pull_request or pull_request_target")]
    UnsupportedEvent(String),

    #[error("no event name was provided; is this running inside a workflow?")]
    MissingEvent,

    #[error("could not determine the pull request number")]
    MissingPullNumber,

    #[error("pull request #{0} is already merged")]
    AlreadyMerged(u64),

    #[error("pull request #{0} changes no files")]
    NoFiles(u64),

    #[error("sorry only 1 file is supported right now (pull request changes {changed})")]
    MultipleFiles { changed: u64 },

    #[error("configuration error: {0}")]
    Config(String),
}

impl BotError {
    /// Short classification string for logging.
    pub fn error_kind(&self) -> &'static str {
        match self {
            Self::Host(err) => err.error_kind(),
            Self::UnsupportedEvent(_) => "unsupported_event",
            Self::MissingEvent => "missing_event",
            Self::MissingPullNumber => "missing_pull_number",
            Self::AlreadyMerged(_) => "already_merged",
            Self::NoFiles(_) => "no_files",
            Self::MultipleFiles { .. } => "multiple_files",
            Self::Config(_) => "config",
        }
    }
}
