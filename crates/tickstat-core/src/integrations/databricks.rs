//! Databricks integration -- connectivity check by listing Unity Catalog
//! catalogs.

use std::path::Path;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{ConfigError, FetchError};
use crate::integrations::traits::Integration;

const SERVICE: &str = "databricks";

/// Workspace host and personal access token, as stored in `mcp.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabricksConfig {
    pub host: String,
    pub token: String,
}

impl DatabricksConfig {
    /// Read `{"host": ..., "token": ...}` from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config: DatabricksConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        if config.host.trim().is_empty() {
            return Err(ConfigError::MissingKey("host".into()));
        }
        if config.token.trim().is_empty() {
            return Err(ConfigError::MissingKey("token".into()));
        }
        Ok(config)
    }
}

pub struct DatabricksClient {
    host: String,
    token: String,
    http: Client,
}

impl DatabricksClient {
    pub fn new(config: DatabricksConfig, timeout: Duration) -> Result<Self, FetchError> {
        let mut host = config.host.trim().trim_end_matches('/').to_string();
        if !host.starts_with("http://") && !host.starts_with("https://") {
            host = format!("https://{host}");
        }
        if url::Url::parse(&host).is_err() {
            return Err(FetchError::NotConfigured {
                service: SERVICE.into(),
                what: format!("a valid host (got '{host}')"),
            });
        }

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::transport(SERVICE, e))?;

        Ok(Self {
            host,
            token: config.token,
            http,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Names of every catalog visible to the token, following pagination.
    pub fn list_catalogs(&self) -> Result<Vec<String>, FetchError> {
        let url = format!("{}/api/2.1/unity-catalog/catalogs", self.host);
        let mut names = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self.http.get(&url).bearer_auth(&self.token);
            if let Some(token) = &page_token {
                request = request.query(&[("page_token", token)]);
            }

            tracing::debug!(%url, "databricks request");
            let resp = request
                .send()
                .map_err(|e| FetchError::transport(SERVICE, e))?;

            let status = resp.status();
            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                return Err(FetchError::Unauthorized {
                    service: SERVICE.into(),
                });
            }
            if !status.is_success() {
                return Err(FetchError::Http {
                    service: SERVICE.into(),
                    status: status.as_u16(),
                    url: url.clone(),
                });
            }

            let data: Value = resp
                .json()
                .map_err(|e| FetchError::decode(SERVICE, e.to_string()))?;

            if let Some(catalogs) = data["catalogs"].as_array() {
                names.extend(
                    catalogs
                        .iter()
                        .filter_map(|c| c["name"].as_str())
                        .map(str::to_string),
                );
            }

            // A server that hands back the token it was given has no more pages.
            match data["next_page_token"].as_str() {
                Some(next) if !next.is_empty() && page_token.as_deref() != Some(next) => {
                    page_token = Some(next.to_string())
                }
                _ => break,
            }
        }

        Ok(names)
    }
}

impl Integration for DatabricksClient {
    fn name(&self) -> &str {
        SERVICE
    }

    fn display_name(&self) -> &str {
        "Databricks"
    }

    fn verify(&self) -> Result<(), FetchError> {
        self.list_catalogs().map(|_| ())
    }
}
