use std::path::PathBuf;
use std::time::Duration;

use tickstat_core::{Config, DatabricksClient, DatabricksConfig};

pub fn run(config_path: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let path = config_path.unwrap_or_else(|| PathBuf::from(&config.databricks.config_path));

    let client = DatabricksClient::new(
        DatabricksConfig::load(&path)?,
        Duration::from_secs(config.databricks.timeout_secs),
    )?;

    match client.list_catalogs() {
        Ok(catalogs) => {
            println!("Successfully connected to Databricks!");
            println!("\nAvailable catalogs:");
            for name in catalogs {
                println!("- {name}");
            }
            Ok(())
        }
        Err(e) => Err(format!("Error connecting to Databricks: {e}").into()),
    }
}
