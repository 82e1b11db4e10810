use clap::Subcommand;
use tickstat_core::integrations::keyring_store;
use tickstat_core::{Config, Integration, JiraClient};

use super::{jira_client, JIRA_TOKEN_KEY};

#[derive(Subcommand)]
pub enum AuthAction {
    /// Jira: login / logout / status
    Jira {
        #[command(subcommand)]
        action: AuthOp,
    },
}

#[derive(Subcommand)]
pub enum AuthOp {
    /// Verify and store credentials
    Login {
        /// API token (https://id.atlassian.com/manage-profile/security/api-tokens)
        #[arg(long)]
        token: Option<String>,
        /// Site URL, e.g. https://acme.atlassian.net (saved to jira.base_url)
        #[arg(long)]
        url: Option<String>,
        /// Account email (saved to jira.email)
        #[arg(long)]
        email: Option<String>,
    },
    /// Remove credentials
    Logout,
    /// Check authentication status
    Status,
}

pub fn run(action: AuthAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        AuthAction::Jira { action: op } => handle_jira(op),
    }
}

fn handle_jira(op: AuthOp) -> Result<(), Box<dyn std::error::Error>> {
    match op {
        AuthOp::Login { token, url, email } => {
            let token = token.ok_or("--token required for Jira")?;
            let mut config = Config::load()?;
            if let Some(url) = url {
                config.update("jira.base_url", &url)?;
            }
            if let Some(email) = email {
                config.update("jira.email", &email)?;
            }

            // Only persist credentials that Jira accepts.
            let client = JiraClient::new(config.jira.client_config(token.as_str()))?;
            client.verify()?;

            config.save()?;
            keyring_store::set(JIRA_TOKEN_KEY, &token)?;
            println!("Jira authenticated");
        }
        AuthOp::Logout => {
            keyring_store::delete(JIRA_TOKEN_KEY)?;
            println!("Jira disconnected");
        }
        AuthOp::Status => {
            let config = Config::load()?;
            match jira_client(&config) {
                Err(_) => println!("not authenticated"),
                Ok(client) => match client.verify() {
                    Ok(()) => println!("authenticated"),
                    Err(e) => println!("credentials stored but rejected: {e}"),
                },
            }
        }
    }
    Ok(())
}
