//! FeedbackHub - operator CLI
//!
//! Review anonymous feedback, filter it by category, run sentiment analysis
//! on individual items and delete feedback pages.
//!
//! Usage:
//!   feedbackhub [OPTIONS] <COMMAND>
//!
//! Examples:
//!   feedbackhub dashboard --category bug
//!   feedbackhub analyze 65f0c1 65f0c2
//!   feedbackhub delete page-abc123

mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use feedbackhub_core::{CategoryFilter, FeedbackHubConfig};
use std::path::PathBuf;
use tracing::{debug, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "feedbackhub")]
#[command(about = "Review anonymous feedback and analyse its sentiment")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Set log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Config file (overrides FEEDBACKHUB_CONFIG and the default location)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the feedback list
    Dashboard {
        /// Category to show, or "all"
        #[arg(short, long, default_value = "all")]
        category: CategoryFilter,

        /// Print the dashboard snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the categories present in the collection
    Categories,

    /// Run sentiment analysis on one or more feedback items
    Analyze {
        /// Feedback ids
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Delete all feedback collected through a page
    Delete {
        /// Page id of the feedback link
        page_id: String,
    },

    /// Show the signed-in user
    Whoami,

    /// End the current session
    Logout,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Use specified level for our crates, but WARN for the HTTP stack
    let filter = EnvFilter::new(format!(
        "feedbackhub={level},feedbackhub_core={level},reqwest=warn,hyper=warn",
        level = level.as_str().to_lowercase()
    ));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr) // Write logs to stderr, not stdout
        .init();

    debug!("FeedbackHub v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = FeedbackHubConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Dashboard { category, json } => {
            cli::dashboard::handle(&config, category, json).await
        }
        Commands::Categories => cli::dashboard::handle_categories(&config).await,
        Commands::Analyze { ids } => cli::analyze::handle(&config, ids).await,
        Commands::Delete { page_id } => cli::delete::handle(&config, page_id).await,
        Commands::Whoami => cli::identity::handle_whoami(&config).await,
        Commands::Logout => cli::identity::handle_logout(&config).await,
    }
}
