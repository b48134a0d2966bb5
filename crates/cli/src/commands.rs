//! Command implementations and the plumbing they share.

use clap::Args;
use octocrab::Octocrab;
use rand::rngs::StdRng;
use rand::SeedableRng;
use review_roster_core::config::{OverridePolicy, ReviewConfig};
use review_roster_core::errors::EngineError;
use review_roster_core::plan::{Plan, PullRequestLocator};
use review_roster_core::{ReviewOptions, ReviewRoster};
use review_roster_developer_platforms::github::GitHubProvider;
use tracing::debug;

use crate::errors::CliError;

pub mod plan_pr;
pub mod run_pr;

/// Arguments shared by every command that operates on a pull request.
#[derive(Args, Debug)]
pub struct ReviewTarget {
    /// Repository in `owner/name` form
    #[arg(short, long)]
    pub repo: String,

    /// Pull request number
    #[arg(short = 'n', long)]
    pub pr_number: u64,

    /// GitHub access token; falls back to the GITHUB_TOKEN environment
    /// variable
    #[arg(short, long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Local policy file used instead of the repository-hosted one
    #[arg(short, long)]
    pub config: Option<String>,

    /// Clear the current reviewers and select a fresh set
    #[arg(long)]
    pub retry: bool,

    /// Clamp the policy for multi-tenant deployments
    #[arg(long)]
    pub public_mode: bool,

    /// Never fill the selection with random reviewers
    #[arg(long)]
    pub no_random_assignment: bool,

    /// Seed for the selection RNG; omit for entropy seeding
    #[arg(long)]
    pub seed: Option<u64>,
}

impl ReviewTarget {
    /// The pull request this invocation targets.
    pub fn locator(&self) -> Result<PullRequestLocator, CliError> {
        let (owner, repo) = self.repo.split_once('/').ok_or_else(|| {
            CliError::InvalidArguments(format!(
                "Repository '{}' is not in owner/name form",
                self.repo
            ))
        })?;

        if owner.is_empty() || repo.is_empty() {
            return Err(CliError::InvalidArguments(format!(
                "Repository '{}' is not in owner/name form",
                self.repo
            )));
        }

        Ok(PullRequestLocator {
            owner: owner.to_string(),
            repo: repo.to_string(),
            number: self.pr_number,
        })
    }

    /// The per-invocation engine options.
    pub fn options(&self) -> ReviewOptions {
        ReviewOptions {
            retry_review: self.retry,
            overrides: OverridePolicy {
                public_mode: self.public_mode,
                disable_random_assignment: self.no_random_assignment,
            },
            chat_identities: None,
        }
    }
}

/// Builds the engine for one invocation, wiring in a local policy file
/// when one was given.
pub fn build_roster(target: &ReviewTarget) -> Result<ReviewRoster<GitHubProvider>, CliError> {
    let client = Octocrab::builder()
        .personal_token(target.token.clone())
        .build()
        .map_err(|e| CliError::AuthError(e.to_string()))?;
    let provider = GitHubProvider::new(client);

    match &target.config {
        Some(path) => {
            debug!(path = %path, "Loading local policy file");
            let text = std::fs::read_to_string(path).map_err(|e| {
                CliError::ConfigError(format!("Failed to read '{path}': {e}"))
            })?;
            let config =
                ReviewConfig::parse(&text).map_err(|e| CliError::ConfigError(e.to_string()))?;
            Ok(ReviewRoster::with_config(provider, config))
        }
        None => Ok(ReviewRoster::new(provider)),
    }
}

/// Plans the review, honoring an explicit seed when one was given.
pub async fn plan_review(
    roster: &ReviewRoster<GitHubProvider>,
    target: &ReviewTarget,
) -> Result<Plan, CliError> {
    let locator = target.locator()?;
    let options = target.options();

    let result = match target.seed {
        Some(seed) => {
            let mut rng = StdRng::seed_from_u64(seed);
            roster
                .plan_review_with_rng(&locator, &options, &mut rng)
                .await
        }
        None => roster.plan_review(&locator, &options).await,
    };

    result.map_err(review_error)
}

fn review_error(err: EngineError) -> CliError {
    match err {
        EngineError::Config(e) => CliError::ConfigError(e.to_string()),
        other => CliError::ReviewFailed(other.to_string()),
    }
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
