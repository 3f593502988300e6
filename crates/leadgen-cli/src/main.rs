mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "leadgen-cli")]
#[command(about = "Company search command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one company search and print the results as JSON
    Search {
        /// Search keyword; repeat for several
        #[arg(long = "keyword", short = 'k', required = true)]
        keywords: Vec<String>,
        /// Restrict the search to a location (e.g. "Berlin")
        #[arg(long)]
        location: Option<String>,
        /// Do not write companies to the database
        #[arg(long)]
        no_persist: bool,
    },
    /// List the most recently saved companies
    Companies {
        /// Maximum number of companies to show
        #[arg(long, default_value = "20")]
        limit: i64,
    },
    /// Apply pending database migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("leadgen-cli: pass --help for available commands");
        return Ok(());
    };

    let config = leadgen_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    // stdout carries command output; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match command {
        Commands::Search {
            keywords,
            location,
            no_persist,
        } => commands::run_search(&config, keywords, location, no_persist).await,
        Commands::Companies { limit } => commands::run_companies(&config, limit).await,
        Commands::Migrate => commands::run_migrate(&config).await,
    }
}
