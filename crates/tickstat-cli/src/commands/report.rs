use chrono::NaiveDate;
use clap::Args;
use tickstat_core::{
    ActivityReport, Config, EmailDirectory, Integration, IntervalAccumulator, ReportContext,
    SystemClock,
};
use tickstat_core::storage::ReportSettings;

use super::jira_client;
use crate::render;

#[derive(Args)]
pub struct ReportArgs {
    /// First day of the window (defaults to report.start)
    #[arg(long)]
    start: Option<NaiveDate>,
    /// Last day of the window, inclusive (defaults to report.end)
    #[arg(long)]
    end: Option<NaiveDate>,
    /// Project key to include; repeatable (defaults to every project matching jira.project_prefix)
    #[arg(long = "project")]
    projects: Vec<String>,
    /// Status to measure (defaults to jira.active_status)
    #[arg(long)]
    status: Option<String>,
    /// Skip the per-person email lookup
    #[arg(long)]
    no_emails: bool,
    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: ReportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let window = ReportSettings {
        start: args.start.unwrap_or(config.report.start),
        end: args.end.unwrap_or(config.report.end),
    }
    .window()?;

    let client = jira_client(&config)?;
    client.verify()?;

    let project_keys = if args.projects.is_empty() {
        let prefix = &config.jira.project_prefix;
        let projects = client.list_projects(prefix)?;
        if projects.is_empty() {
            return Err(format!(
                "no {prefix} projects found; check that you have access to at least one"
            )
            .into());
        }
        projects.into_keys().collect()
    } else {
        args.projects
    };

    let (issues, warnings) = client.fetch_all_issues(&project_keys, &window);

    let emails: Option<&dyn EmailDirectory> = if args.no_emails {
        None
    } else {
        Some(&client as &dyn EmailDirectory)
    };
    let ctx = ReportContext {
        window,
        accumulator: IntervalAccumulator::new(
            args.status.unwrap_or_else(|| config.jira.active_status.clone()),
        ),
        changelogs: &client,
        emails,
        clock: &SystemClock,
        base_url: client.base_url(),
    };
    let report = ActivityReport::build(&ctx, &issues, warnings);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render::render_report(&report));
    }
    Ok(())
}
