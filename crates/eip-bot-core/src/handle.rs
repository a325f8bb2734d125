use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A GitHub user handle as it was written (`@alice`, `alice`, `Alice`).
///
/// Comparison goes through [`Handle::login`], so `@Alice` and `alice` are
/// the same user. Display keeps the original spelling, which is what ends up
/// in mention strings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Handle(String);

impl Handle {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into().trim().to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Login without the leading `@`, lowercased.
    pub fn login(&self) -> String {
        self.0.trim_start_matches('@').to_ascii_lowercase()
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim_start_matches('@').is_empty()
    }
}

impl PartialEq for Handle {
    fn eq(&self, other: &Self) -> bool {
        self.login() == other.login()
    }
}

impl Eq for Handle {}

impl Hash for Handle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.login().hash(state);
    }
}

impl PartialOrd for Handle {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Handle {
    fn cmp(&self, other: &Self) -> Ordering {
        self.login().cmp(&other.login())
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Handle {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Handle {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}
