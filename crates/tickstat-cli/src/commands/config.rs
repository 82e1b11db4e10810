use clap::Subcommand;
use tickstat_core::{Config, ConfigError};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one setting
    Get {
        /// Dot-path key, e.g. "jira.project_prefix" or "report.start"
        key: String,
    },
    /// Change one setting; the value must parse as the setting's type
    Set {
        /// Dot-path key
        key: String,
        /// New value (dates as YYYY-MM-DD)
        value: String,
    },
    /// Print every setting as JSON
    List,
    /// Restore the default Jira, report and Databricks settings
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let value = Config::load()?
                .get(&key)
                .ok_or(ConfigError::UnknownKey(key))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            Config::load()?.set(&key, &value)?;
            println!("ok");
        }
        ConfigAction::List => {
            println!("{}", serde_json::to_string_pretty(&Config::load()?)?);
        }
        ConfigAction::Reset => {
            // The keyring token is left alone; `auth jira logout` removes it.
            Config::default().save()?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
