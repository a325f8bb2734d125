//! Layered bot configuration.
//!
//! Sources, lowest priority first:
//! 1. compiled defaults
//! 2. optional JSON config file
//! 3. GitHub Actions environment (`GITHUB_TOKEN`, `GITHUB_REPOSITORY`, ...)
//! 4. `EIP_BOT_*` environment variables
//! 5. command-line overrides

mod errors;
mod loader;

pub use errors::{Result, SettingsError};
pub use loader::{
    figment, from_figment, load, CliOverrides, RawSettings, Settings, DEFAULT_API_URL,
};
