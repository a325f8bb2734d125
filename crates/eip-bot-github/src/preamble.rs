//! EIP preamble (YAML front matter) parsing.

use std::sync::LazyLock;

use eip_bot_core::{filename_eip_number, FormattedFile, Handle, HostError};
use regex::Regex;
use serde::Deserialize;
use serde_yaml::Value;

static GITHUB_HANDLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(\s*@([A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)\s*\)").unwrap());

#[derive(Debug, Default, Deserialize)]
struct Preamble {
    #[serde(default)]
    eip: Option<Value>,
    #[serde(default)]
    status: Option<Value>,
    #[serde(default)]
    author: Option<String>,
}

/// Text between the leading `---` line and the next `---` line, if any.
pub fn front_matter(content: &str) -> Option<&str> {
    let content = content.trim_start_matches('\u{feff}');
    let rest = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))?;
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some(&rest[..offset]);
        }
        offset += line.len();
    }
    None
}

/// GitHub handles written as `(@handle)` in an `author` field, in order,
/// without duplicates. Email-only authors cannot approve and are skipped.
pub fn author_handles(author: &str) -> Vec<Handle> {
    let mut handles: Vec<Handle> = Vec::new();
    for caps in GITHUB_HANDLE.captures_iter(author) {
        let handle = Handle::new(format!("@{}", &caps[1]));
        if !handles.contains(&handle) {
            handles.push(handle);
        }
    }
    handles
}

fn as_number(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Parse the preamble of the file at `path`.
///
/// A file without front matter yields empty fields; the rules report what is
/// missing. Front matter that is not valid YAML is an error.
pub fn parse_file(path: &str, content: &str) -> Result<FormattedFile, HostError> {
    let preamble = match front_matter(content) {
        Some(yaml) if !yaml.trim().is_empty() => {
            serde_yaml::from_str::<Preamble>(yaml).map_err(|e| HostError::Preamble {
                path: path.to_owned(),
                reason: e.to_string(),
            })?
        }
        _ => Preamble::default(),
    };

    Ok(FormattedFile {
        path: path.to_owned(),
        filename_eip_num: filename_eip_number(path),
        eip_num: preamble.eip.as_ref().and_then(as_number),
        status: preamble.status.as_ref().and_then(as_text),
        authors: preamble
            .author
            .as_deref()
            .map(author_handles)
            .unwrap_or_default(),
    })
}
