//! TOML-based application configuration.
//!
//! Stores:
//! - Jira connection settings (site URL, account email, project prefix)
//! - Report defaults (date window, tracked status)
//! - Location of the Databricks connection file
//!
//! Configuration is stored at `~/.config/tickstat/config.toml`. Secrets are
//! not part of this file; the Jira API token lives in the OS keyring.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::activity::ReportingWindow;
use crate::error::{ConfigError, CoreError, Result};
use crate::integrations::jira::JiraConfig;

/// Jira connection and query settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraSettings {
    /// Site root, e.g. `https://acme.atlassian.net`.
    #[serde(default)]
    pub base_url: String,
    /// Account email used for basic auth.
    #[serde(default)]
    pub email: String,
    /// Only projects whose key starts with this prefix are reported.
    #[serde(default = "default_project_prefix")]
    pub project_prefix: String,
    #[serde(default = "default_active_status")]
    pub active_status: String,
    /// Custom field holding story points.
    #[serde(default = "default_story_points_field")]
    pub story_points_field: String,
    #[serde(default = "default_max_results")]
    pub max_results: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Default reporting window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSettings {
    #[serde(default = "default_start")]
    pub start: NaiveDate,
    #[serde(default = "default_end")]
    pub end: NaiveDate,
}

/// Databricks connectivity check settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabricksSettings {
    /// JSON file with `host` and `token`.
    #[serde(default = "default_databricks_config_path")]
    pub config_path: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/tickstat/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub jira: JiraSettings,
    #[serde(default)]
    pub report: ReportSettings,
    #[serde(default)]
    pub databricks: DatabricksSettings,
}

// Default functions
fn default_project_prefix() -> String {
    "ASA".into()
}
fn default_active_status() -> String {
    "In Progress".into()
}
fn default_story_points_field() -> String {
    "customfield_10016".into()
}
fn default_max_results() -> u32 {
    1000
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 1).unwrap_or_default()
}
fn default_end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 31).unwrap_or_default()
}
fn default_databricks_config_path() -> String {
    "mcp.json".into()
}

impl Default for JiraSettings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            email: String::new(),
            project_prefix: default_project_prefix(),
            active_status: default_active_status(),
            story_points_field: default_story_points_field(),
            max_results: default_max_results(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            start: default_start(),
            end: default_end(),
        }
    }
}

impl Default for DatabricksSettings {
    fn default() -> Self {
        Self {
            config_path: default_databricks_config_path(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl JiraSettings {
    /// Combine stored settings with the API token into a client config.
    pub fn client_config(&self, api_token: impl Into<String>) -> JiraConfig {
        JiraConfig {
            base_url: self.base_url.clone(),
            email: self.email.clone(),
            api_token: api_token.into(),
            story_points_field: self.story_points_field.clone(),
            max_results: self.max_results,
            timeout_secs: self.timeout_secs,
        }
    }
}

impl ReportSettings {
    /// Window covering `start..=end`; fails when `end` precedes `start`.
    pub fn window(&self) -> Result<ReportingWindow> {
        Ok(ReportingWindow::new(self.start, self.end)?)
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    /// Replace the leaf at `key`, parsing `value` as the type already stored
    /// there. Sections (`jira`, `report`) cannot be overwritten wholesale.
    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> std::result::Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let (parent, leaf) = match key.rsplit_once('.') {
            Some((parent, leaf)) => (Some(parent), leaf),
            None => (None, key),
        };
        let mut current = root;
        for part in parent.into_iter().flat_map(|p| p.split('.')) {
            current = current.get_mut(part).ok_or_else(unknown)?;
        }
        let obj = current.as_object_mut().ok_or_else(unknown)?;

        let new_value = match obj.get(leaf).ok_or_else(unknown)? {
            serde_json::Value::Bool(_) => value
                .parse::<bool>()
                .map(serde_json::Value::Bool)
                .map_err(|_| invalid(format!("cannot parse '{value}' as true/false")))?,
            serde_json::Value::Number(_) => value
                .parse::<u64>()
                .map(|n| serde_json::Value::Number(n.into()))
                .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
            serde_json::Value::Object(_) => {
                return Err(invalid("this is a section, not a value".into()));
            }
            _ => serde_json::Value::String(value.into()),
        };

        obj.insert(leaf.to_string(), new_value);
        Ok(())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load `~/.config/tickstat/config.toml`, creating it with defaults if
    /// absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file does not exist.
    /// Missing keys in an existing file take their defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                CoreError::from(ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Value at a dot-separated key such as `jira.base_url`, rendered as
    /// text. `None` for unknown keys.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Update a value in memory by dot-separated key. On error `self` is
    /// left unchanged.
    ///
    /// # Errors
    ///
    /// `ConfigError::UnknownKey` for a key that names no setting,
    /// `ConfigError::InvalidValue` when `value` does not fit the setting
    /// (a non-number for `jira.max_results`, a non-date for `report.start`).
    pub fn update(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Update a value by key and persist to the default location.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.update(key, value)?;
        self.save()
    }
}
