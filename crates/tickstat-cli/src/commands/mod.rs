pub mod auth;
pub mod catalogs;
pub mod check;
pub mod config;
pub mod projects;
pub mod report;

use tickstat_core::integrations::keyring_store;
use tickstat_core::{Config, JiraClient};

/// Keyring entry holding the Jira API token.
pub const JIRA_TOKEN_KEY: &str = "jira_api_token";

/// Build a Jira client from stored settings and the keyring token.
pub fn jira_client(config: &Config) -> Result<JiraClient, Box<dyn std::error::Error>> {
    let token = keyring_store::get(JIRA_TOKEN_KEY)?
        .ok_or("no Jira API token stored; run `tickstat auth jira login --token <TOKEN>`")?;
    Ok(JiraClient::new(config.jira.client_config(token))?)
}
