//! The `plan` command: select reviewers and print the action plan
//! without touching the platform.

use clap::Args;
use tracing::{info, instrument};

use crate::commands::{build_roster, plan_review, ReviewTarget};
use crate::errors::CliError;

/// Arguments for the plan command
#[derive(Args, Debug)]
pub struct PlanPrArgs {
    #[command(flatten)]
    pub target: ReviewTarget,
}

/// Plans a review and writes the plan as JSON to stdout.
#[instrument(skip_all, fields(repo = %args.target.repo, pr = args.target.pr_number))]
pub async fn execute(args: PlanPrArgs) -> Result<(), CliError> {
    let roster = build_roster(&args.target)?;
    let plan = plan_review(&roster, &args.target).await?;

    info!(actions = plan.actions.len(), "Plan generated");
    let rendered =
        serde_json::to_string_pretty(&plan).map_err(|e| CliError::Other(e.to_string()))?;
    println!("{rendered}");

    Ok(())
}
