use std::path::Path;
use std::time::Duration;

use tickstat_core::{Config, DatabricksClient, DatabricksConfig, Integration};

use super::jira_client;

fn databricks_client(config: &Config) -> Result<DatabricksClient, Box<dyn std::error::Error>> {
    let path = Path::new(&config.databricks.config_path);
    Ok(DatabricksClient::new(
        DatabricksConfig::load(path)?,
        Duration::from_secs(config.databricks.timeout_secs),
    )?)
}

/// Verify every integration that has settings. A broken integration is
/// reported on its own line and never stops the others from being checked.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let mut integrations: Vec<Box<dyn Integration>> = Vec::new();
    let mut failed = 0;

    match jira_client(&config) {
        Ok(client) => integrations.push(Box::new(client)),
        Err(e) => println!("Jira: not configured ({e})"),
    }

    let db_path = Path::new(&config.databricks.config_path);
    if !db_path.exists() {
        println!(
            "Databricks: not configured ({} not found)",
            db_path.display()
        );
    } else {
        match databricks_client(&config) {
            Ok(client) => integrations.push(Box::new(client)),
            Err(e) => {
                failed += 1;
                println!("Databricks: {e}");
            }
        }
    }

    for integration in &integrations {
        match integration.verify() {
            Ok(()) => println!("{}: ok", integration.display_name()),
            Err(e) => {
                failed += 1;
                println!("{}: {e}", integration.display_name());
            }
        }
    }

    if failed > 0 {
        return Err(format!("{failed} integration check(s) failed").into());
    }
    Ok(())
}
