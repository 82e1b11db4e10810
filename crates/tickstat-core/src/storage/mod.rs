//! On-disk state: only the user's TOML configuration. Reports are computed
//! fresh on every run and never written here.

mod config;

pub use config::{Config, DatabricksSettings, JiraSettings, ReportSettings};

use std::path::PathBuf;

use crate::error::Result;

/// Directory holding `config.toml`, created on first use.
///
/// `~/.config/tickstat/` normally; `~/.config/tickstat-dev/` when
/// `TICKSTAT_ENV=dev`, so a development build never touches the real
/// Jira settings. Falls back to `./.config` without a home directory.
pub fn data_dir() -> Result<PathBuf> {
    let name = match std::env::var("TICKSTAT_ENV").as_deref() {
        Ok("dev") => "tickstat-dev",
        _ => "tickstat",
    };
    let dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join(name);

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
