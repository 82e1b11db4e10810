use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "tickstat", version, about = "Jira ticket activity and Databricks connectivity")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Per-person ticket activity for a date window
    Report(commands::report::ReportArgs),
    /// List Jira projects matching the configured prefix
    Projects {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Verify every configured integration
    Check,
    /// List Databricks catalogs to verify connectivity
    Catalogs {
        /// JSON file with host and token (defaults to databricks.config_path)
        #[arg(long)]
        config: Option<std::path::PathBuf>,
    },
    /// Authentication management for integrations
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Report(args) => commands::report::run(args),
        Commands::Projects { json } => commands::projects::run(json),
        Commands::Check => commands::check::run(),
        Commands::Catalogs { config } => commands::catalogs::run(config),
        Commands::Auth { action } => commands::auth::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
