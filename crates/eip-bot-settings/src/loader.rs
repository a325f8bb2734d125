use std::path::{Path, PathBuf};

use eip_bot_core::Handle;
use eip_bot_telemetry::LogFormat;
use figment::providers::{Env, Format, Json, Serialized};
use figment::value::{Uncased, UncasedStr};
use figment::Figment;
use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::errors::{Result, SettingsError};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
const ENV_PREFIX: &str = "EIP_BOT_";
const ACTIONS_VARS: &[&str] = &[
    "GITHUB_TOKEN",
    "GITHUB_REPOSITORY",
    "GITHUB_API_URL",
    "GITHUB_EVENT_NAME",
    "GITHUB_EVENT_PATH",
    "EIP_EDITORS",
];

/// Settings as extracted from the layered sources, before validation.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    pub api_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_path: Option<PathBuf>,
    #[serde(deserialize_with = "string_or_list")]
    pub editors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pull_number: Option<u64>,
    pub dry_run: bool,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Default for RawSettings {
    fn default() -> Self {
        Self {
            token: None,
            repository: None,
            api_url: DEFAULT_API_URL.to_owned(),
            event_name: None,
            event_path: None,
            editors: Vec::new(),
            pull_number: None,
            dry_run: false,
            log_level: "info".to_owned(),
            log_format: LogFormat::Text,
        }
    }
}

/// Values given on the command line. Unset fields leave lower layers alone.
#[derive(Clone, Debug, Default, Serialize)]
pub struct CliOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pull_number: Option<u64>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub dry_run: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_format: Option<LogFormat>,
}

#[derive(Debug)]
pub struct Settings {
    pub token: Option<SecretString>,
    /// `owner/name`
    pub repository: String,
    pub api_url: String,
    pub event_name: Option<String>,
    pub event_path: Option<PathBuf>,
    pub editors: Vec<Handle>,
    pub pull_number: Option<u64>,
    pub dry_run: bool,
    pub log_level: String,
    pub log_format: LogFormat,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrList {
    List(Vec<String>),
    Joined(String),
}

fn string_or_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match StringOrList::deserialize(deserializer)? {
        StringOrList::List(items) => items,
        StringOrList::Joined(joined) => joined.split(',').map(str::to_owned).collect(),
    };
    Ok(items
        .into_iter()
        .map(|item| item.trim().to_owned())
        .filter(|item| !item.is_empty())
        .collect())
}

fn actions_key(key: &UncasedStr) -> Uncased<'_> {
    let mapped = match key.as_str().to_ascii_uppercase().as_str() {
        "GITHUB_TOKEN" => "token",
        "GITHUB_REPOSITORY" => "repository",
        "GITHUB_API_URL" => "api_url",
        "GITHUB_EVENT_NAME" => "event_name",
        "GITHUB_EVENT_PATH" => "event_path",
        "EIP_EDITORS" => "editors",
        _ => return key.as_str().into(),
    };
    mapped.into()
}

/// The full provider stack. `config` must exist when given.
pub fn figment(config: Option<&Path>, overrides: &CliOverrides) -> Result<Figment> {
    let mut figment = Figment::from(Serialized::defaults(RawSettings::default()));
    if let Some(path) = config {
        if !path.is_file() {
            return Err(SettingsError::MissingFile(path.to_path_buf()));
        }
        debug!(?path, "loading config file");
        figment = figment.merge(Json::file(path));
    }
    Ok(figment
        .merge(Env::raw().only(ACTIONS_VARS).map(actions_key))
        .merge(Env::prefixed(ENV_PREFIX))
        .merge(Serialized::defaults(overrides)))
}

pub fn load(config: Option<&Path>, overrides: &CliOverrides) -> Result<Settings> {
    from_figment(&figment(config, overrides)?)
}

pub fn from_figment(figment: &Figment) -> Result<Settings> {
    let raw: RawSettings = figment.extract()?;
    validate(raw)
}

fn validate(raw: RawSettings) -> Result<Settings> {
    let repository = raw
        .repository
        .map(|r| r.trim().to_owned())
        .ok_or_else(|| SettingsError::InvalidValue("repository is not set".into()))?;
    let valid_repo = matches!(
        repository.split_once('/'),
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/')
    );
    if !valid_repo {
        return Err(SettingsError::InvalidValue(format!(
            "repository must be owner/name, got {repository:?}"
        )));
    }

    let editors: Vec<Handle> = raw.editors.into_iter().map(Handle::new).collect();
    if editors.is_empty() {
        return Err(SettingsError::InvalidValue("no editors configured".into()));
    }

    Ok(Settings {
        token: raw.token.filter(|t| !t.is_empty()).map(SecretString::from),
        repository,
        api_url: raw.api_url.trim_end_matches('/').to_owned(),
        event_name: raw.event_name,
        event_path: raw.event_path,
        editors,
        pull_number: raw.pull_number,
        dry_run: raw.dry_run,
        log_level: raw.log_level,
        log_format: raw.log_format,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use figment::Jail;
    use secrecy::ExposeSecret;

    fn load_in(jail: &Jail, config: Option<&str>, overrides: &CliOverrides) -> Result<Settings> {
        let path = config.map(|c| jail.directory().join(c));
        load(path.as_deref(), overrides)
    }

    #[test]
    fn reads_github_actions_environment() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("GITHUB_TOKEN", "ghp_secret");
            jail.set_env("GITHUB_REPOSITORY", "ethereum/EIPs");
            jail.set_env("GITHUB_EVENT_NAME", "pull_request_target");
            jail.set_env("GITHUB_EVENT_PATH", "/tmp/event.json");
            jail.set_env("EIP_EDITORS", "@ed1, @ed2,");

            let settings = load_in(jail, None, &CliOverrides::default()).unwrap();
            assert_eq!(settings.repository, "ethereum/EIPs");
            assert_eq!(settings.api_url, DEFAULT_API_URL);
            assert_eq!(settings.event_name.as_deref(), Some("pull_request_target"));
            assert_eq!(settings.event_path, Some(PathBuf::from("/tmp/event.json")));
            assert_eq!(
                settings.editors,
                vec![Handle::from("@ed1"), Handle::from("@ed2")]
            );
            assert_eq!(settings.token.unwrap().expose_secret(), "ghp_secret");
            assert_eq!(settings.log_format, LogFormat::Text);
            Ok(())
        });
    }

    #[test]
    fn config_file_then_env_then_cli() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file(
                "eip-bot.json",
                r#"{
                    "repository": "fork/EIPs",
                    "editors": ["@ed1", "@ed2"],
                    "pull_number": 5,
                    "log_level": "debug"
                }"#,
            )?;
            jail.set_env("GITHUB_REPOSITORY", "ethereum/EIPs");
            jail.set_env("EIP_BOT_LOG_LEVEL", "warn");

            let settings = load_in(jail, Some("eip-bot.json"), &CliOverrides::default()).unwrap();
            assert_eq!(settings.repository, "ethereum/EIPs");
            assert_eq!(settings.pull_number, Some(5));
            assert_eq!(settings.log_level, "warn");
            assert_eq!(settings.editors.len(), 2);
            assert!(!settings.dry_run);

            let overrides = CliOverrides {
                pull_number: Some(9),
                dry_run: true,
                log_format: Some(LogFormat::Json),
            };
            let settings = load_in(jail, Some("eip-bot.json"), &overrides).unwrap();
            assert_eq!(settings.pull_number, Some(9));
            assert!(settings.dry_run);
            assert_eq!(settings.log_format, LogFormat::Json);
            Ok(())
        });
    }

    #[test]
    fn prefixed_env_beats_actions_env() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("GITHUB_REPOSITORY", "ethereum/EIPs");
            jail.set_env("EIP_BOT_REPOSITORY", "mirror/EIPs");
            jail.set_env("EIP_EDITORS", "@ed1");
            jail.set_env("EIP_BOT_API_URL", "https://ghe.example.com/api/v3/");

            let settings = load_in(jail, None, &CliOverrides::default()).unwrap();
            assert_eq!(settings.repository, "mirror/EIPs");
            assert_eq!(settings.api_url, "https://ghe.example.com/api/v3");
            assert!(settings.token.is_none());
            Ok(())
        });
    }

    #[test]
    fn missing_config_file_is_an_error() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            let err = load_in(jail, Some("absent.json"), &CliOverrides::default()).unwrap_err();
            assert_matches!(err, SettingsError::MissingFile(_));
            Ok(())
        });
    }

    #[test]
    fn rejects_bad_repository_and_missing_editors() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("EIP_EDITORS", "@ed1");
            assert_matches!(
                load_in(jail, None, &CliOverrides::default()),
                Err(SettingsError::InvalidValue(msg)) if msg.contains("not set")
            );

            jail.set_env("GITHUB_REPOSITORY", "just-a-name");
            assert_matches!(
                load_in(jail, None, &CliOverrides::default()),
                Err(SettingsError::InvalidValue(msg)) if msg.contains("owner/name")
            );

            jail.set_env("GITHUB_REPOSITORY", "ethereum/EIPs");
            jail.set_env("EIP_EDITORS", " , ");
            assert_matches!(
                load_in(jail, None, &CliOverrides::default()),
                Err(SettingsError::InvalidValue(msg)) if msg.contains("editors")
            );
            Ok(())
        });
    }

    #[test]
    fn malformed_config_file_surfaces_figment_error() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file("eip-bot.json", "{ not json")?;
            assert_matches!(
                load_in(jail, Some("eip-bot.json"), &CliOverrides::default()),
                Err(SettingsError::Figment(_))
            );
            Ok(())
        });
    }
}
