//! # Review Roster CLI
//!
//! Command-line interface for the reviewer assignment engine. Selects
//! reviewers for a pull request from its blame history and the
//! repository's review policy, then either prints the resulting action
//! plan or applies it.
//!
//! # Commands
//!
//! - `plan` - Select reviewers and print the action plan as JSON
//! - `run` - Select reviewers and apply the plan to the pull request
//!
//! # Examples
//!
//! ```bash
//! # Preview the plan for a pull request
//! review-roster plan --repo owner/repo --pr-number 123
//!
//! # Assign and notify the selected reviewers
//! review-roster run --repo owner/repo --pr-number 123
//!
//! # Replace the current reviewers with a fresh selection
//! review-roster run --repo owner/repo --pr-number 123 --retry
//! ```

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

mod errors;

use commands::plan_pr::PlanPrArgs;
use commands::run_pr::RunPrArgs;
use errors::CliError;

/// Command-line interface structure for Review Roster.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

/// Available commands for the Review Roster CLI.
#[derive(Subcommand)]
enum Commands {
    /// Select reviewers and print the action plan without applying it
    Plan(PlanPrArgs),

    /// Select reviewers and apply the plan to the pull request
    Run(RunPrArgs),
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::registry()
        .with(fmt::layer().pretty())
        .with(EnvFilter::from_env("REVIEW_ROSTER_LOG"))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Plan(args) => commands::plan_pr::execute(args).await,
        Commands::Run(args) => commands::run_pr::execute(args).await,
    };

    if let Err(e) = &result {
        error!("Command failed: {}", e);
    }

    result
}
