//! Settings error types.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("config file not found: {}", .0.display())]
    MissingFile(PathBuf),
    /// Extraction failed in one of the layered sources.
    #[error("failed to load settings: {0}")]
    Figment(#[from] Box<figment::Error>),
    #[error("invalid settings value: {0}")]
    InvalidValue(String),
}

impl From<figment::Error> for SettingsError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, SettingsError>;
