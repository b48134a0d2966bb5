//! The `run` command: select reviewers and apply the resulting plan.

use clap::Args;
use review_roster_core::execute::execute_plan;
use tracing::{info, instrument};

use crate::commands::{build_roster, plan_review, ReviewTarget};
use crate::errors::CliError;

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunPrArgs {
    #[command(flatten)]
    pub target: ReviewTarget,

    /// Print the plan before applying it
    #[arg(long)]
    pub show_plan: bool,
}

/// Plans a review and executes every action against the platform.
#[instrument(skip_all, fields(repo = %args.target.repo, pr = args.target.pr_number))]
pub async fn execute(args: RunPrArgs) -> Result<(), CliError> {
    let roster = build_roster(&args.target)?;
    let plan = plan_review(&roster, &args.target).await?;

    if args.show_plan {
        let rendered =
            serde_json::to_string_pretty(&plan).map_err(|e| CliError::Other(e.to_string()))?;
        println!("{rendered}");
    }

    execute_plan(roster.provider(), None, &plan)
        .await
        .map_err(|e| CliError::ReviewFailed(e.to_string()))?;

    info!(actions = plan.actions.len(), "Plan applied");
    Ok(())
}
