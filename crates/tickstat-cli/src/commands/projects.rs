use tickstat_core::Config;

use super::jira_client;
use crate::render;

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let client = jira_client(&config)?;
    let projects = client.list_projects(&config.jira.project_prefix)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&projects)?);
        return Ok(());
    }

    if projects.is_empty() {
        println!(
            "No {} projects found. Check that you have access to at least one.",
            config.jira.project_prefix
        );
        return Ok(());
    }

    let rows = projects
        .into_iter()
        .map(|(key, name)| vec![key, name])
        .collect();
    print!("{}", render::table(&["Key", "Name"], rows));
    Ok(())
}
