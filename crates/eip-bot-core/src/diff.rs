use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::handle::Handle;

/// Directory EIP documents live in.
pub const EIP_DIRECTORY: &str = "EIPS";

static EIP_FILENAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^eip-(\d+)\.md$").unwrap());

/// Number encoded in an EIP path's basename, e.g. `EIPS/eip-20.md` -> 20.
pub fn filename_eip_number(path: &str) -> Option<u32> {
    let basename = path.rsplit('/').next().unwrap_or(path);
    EIP_FILENAME
        .captures(basename)
        .and_then(|caps| caps[1].parse().ok())
}

/// Whether `path` is `EIPS/eip-<digits>.md`.
pub fn is_eip_path(path: &str) -> bool {
    match path.split_once('/') {
        Some((dir, rest)) => {
            dir == EIP_DIRECTORY && !rest.contains('/') && filename_eip_number(rest).is_some()
        }
        None => false,
    }
}

/// Preamble fields of one version of an EIP file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedFile {
    /// Repository path of this version.
    pub path: String,
    /// Number encoded in the filename (`eip-1234.md` -> 1234).
    pub filename_eip_num: Option<u32>,
    /// Number declared in the preamble's `eip` field.
    pub eip_num: Option<u32>,
    pub status: Option<String>,
    pub authors: Vec<Handle>,
}

impl FormattedFile {
    /// Status trimmed and lowercased, for comparisons.
    pub fn normalized_status(&self) -> Option<String> {
        self.status
            .as_deref()
            .map(|s| s.trim().to_ascii_lowercase())
            .filter(|s| !s.is_empty())
    }
}

/// Before/after snapshot of the single file changed by a pull request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDiff {
    /// Path of the head version.
    pub path: String,
    /// `None` when the file is added by the pull request.
    pub base: Option<FormattedFile>,
    pub head: FormattedFile,
    pub added_lines: Vec<String>,
    pub removed_lines: Vec<String>,
}

impl FileDiff {
    /// Authors allowed to approve the change.
    ///
    /// Taken from the base version when there is one, so that a pull request
    /// cannot grant its own author approval rights by editing the preamble.
    pub fn approving_authors(&self) -> &[Handle] {
        match &self.base {
            Some(base) => &base.authors,
            None => &self.head.authors,
        }
    }

    /// Whether the head declares (or the filename encodes) EIP-1.
    pub fn is_eip1(&self) -> bool {
        self.head.eip_num.or(self.head.filename_eip_num) == Some(1)
    }

    pub fn status_changed(&self) -> bool {
        self.base
            .as_ref()
            .is_some_and(|base| base.normalized_status() != self.head.normalized_status())
    }
}
