//! # Review Roster Core
//!
//! Policy-driven reviewer selection for pull requests. Given a pull
//! request and a policy document, the engine scores candidates from the
//! change's blame history, applies the configured heuristic adjustments
//! and fills, and emits an ordered action [`Plan`] describing the
//! assignments and notifications to perform. Planning is pure apart from
//! platform reads; [`execute::execute_plan`] applies a plan.
//!
//! All randomness flows through a caller-suppliable RNG, so two runs over
//! the same inputs and seed produce the same plan.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use review_roster_developer_platforms::errors::Error as PlatformError;
use review_roster_developer_platforms::models::{BlameRange, PullRequestFile};
use review_roster_developer_platforms::{ConfigFetcher, PullRequestProvider};
use tracing::{debug, instrument, warn};

pub mod assignment;
pub mod blame;
pub mod config;
pub mod errors;
pub mod execute;
pub mod heuristic;
pub mod paths;
pub mod plan;
pub mod quota;
pub mod scoring;

mod eligibility;

pub use eligibility::EligibilityFilter;

use assignment::AssignmentInput;
use async_trait::async_trait;
use blame::BlameSource;
use config::{OverridePolicy, ReviewConfig};
use errors::EngineError;
use plan::{Plan, PullRequestLocator};

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// Repository-relative path of the policy document.
pub const CONFIG_FILE: &str = ".pull-review";

/// Per-invocation options for planning a review.
#[derive(Debug, Clone, Default)]
pub struct ReviewOptions {
    /// Clear the current reviewers and select a fresh set
    pub retry_review: bool,
    /// Environment-level configuration overrides
    pub overrides: OverridePolicy,
    /// External login-to-chat-identity mapping, consulted before the
    /// reviewer roster when rendering chat notifications
    pub chat_identities: Option<BTreeMap<String, String>>,
}

/// The review engine, bound to one platform provider.
///
/// With [`ReviewRoster::new`] the policy document is fetched from the
/// pull request's own repository at its head commit; with
/// [`ReviewRoster::with_config`] a fixed, already-resolved policy is used
/// instead.
pub struct ReviewRoster<P> {
    provider: P,
    config: Option<ReviewConfig>,
}

impl<P> ReviewRoster<P>
where
    P: PullRequestProvider + ConfigFetcher,
{
    /// Creates an engine that reads the policy from the repository under
    /// review.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            config: None,
        }
    }

    /// Creates an engine with a fixed policy, bypassing the repository
    /// lookup.
    pub fn with_config(provider: P, config: ReviewConfig) -> Self {
        Self {
            provider,
            config: Some(config),
        }
    }

    /// The platform provider this engine plans against.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Plans a review with an entropy-seeded RNG.
    ///
    /// # Errors
    ///
    /// See [`ReviewRoster::plan_review_with_rng`].
    pub async fn plan_review(
        &self,
        pull_request: &PullRequestLocator,
        options: &ReviewOptions,
    ) -> Result<Plan, EngineError> {
        let mut rng = StdRng::from_entropy();
        self.plan_review_with_rng(pull_request, options, &mut rng)
            .await
    }

    /// Plans a review, drawing all randomness from the given RNG.
    ///
    /// # Errors
    ///
    /// - [`EngineError::PullRequestNotOpen`] for closed or merged pull
    ///   requests
    /// - [`EngineError::MissingConfiguration`] when the repository holds
    ///   no policy document
    /// - [`EngineError::LabelBlocked`] / [`EngineError::LabelNotPermitted`]
    ///   when label gating rejects the pull request
    /// - [`EngineError::MissingAuthor`] when the pull request has no
    ///   author
    /// - Any selection error from [`assignment::select_reviewers`]
    #[instrument(
        skip_all,
        fields(
            owner = %pull_request.owner,
            repo = %pull_request.repo,
            number = pull_request.number,
            retry = options.retry_review,
        )
    )]
    pub async fn plan_review_with_rng<R: Rng>(
        &self,
        pull_request: &PullRequestLocator,
        options: &ReviewOptions,
        rng: &mut R,
    ) -> Result<Plan, EngineError> {
        let pr = self
            .provider
            .get_pull_request(&pull_request.owner, &pull_request.repo, pull_request.number)
            .await?;

        if !pr.is_open() {
            return Err(EngineError::PullRequestNotOpen);
        }

        let config = self.resolve_config(pull_request, &pr.head_sha).await?;
        let config = config.apply_overrides(&options.overrides);

        if config.gates_on_labels() {
            self.check_labels(pull_request, &config).await?;
        }

        let author = pr
            .author
            .as_ref()
            .map(|user| user.login.clone())
            .ok_or(EngineError::MissingAuthor)?;

        let mut existing: Vec<String> = if config.use_review_requests {
            self.provider
                .get_requested_reviewers(
                    &pull_request.owner,
                    &pull_request.repo,
                    pull_request.number,
                )
                .await?
        } else {
            pr.assignees.iter().map(|user| user.login.clone()).collect()
        };

        let commits = match self
            .provider
            .get_pull_request_commits(
                &pull_request.owner,
                &pull_request.repo,
                pull_request.number,
            )
            .await
        {
            Ok(commits) => commits,
            Err(e) => {
                warn!(error = %e, "Failed to fetch commits; skipping committer exclusion");
                Vec::new()
            }
        };

        let files = self
            .provider
            .get_pull_request_files(&pull_request.owner, &pull_request.repo, pull_request.number)
            .await?;

        // On a retry the current reviewers are about to be unassigned, so
        // they leave the quota but stay barred from re-selection.
        let mut excluded = Vec::new();
        let mut prior = Vec::new();
        if options.retry_review {
            excluded = existing.clone();
            prior = std::mem::take(&mut existing);
        }

        let input = AssignmentInput {
            files,
            commits,
            existing_assignees: existing,
            author,
            excluded,
        };

        let source = ProviderBlameSource {
            provider: &self.provider,
            owner: &pull_request.owner,
            repo: &pull_request.repo,
            git_ref: &pr.head_sha,
        };

        let selection =
            assignment::select_reviewers(&config, &input, &source, rng).await?;
        debug!(selected = selection.len(), "Reviewer selection complete");

        let resolver = options.chat_identities.as_ref().map(|identities| {
            move |login: &str| identities.get(login).cloned()
        });

        Ok(plan::generate_plan(
            &config,
            pull_request,
            &selection,
            &prior,
            options.retry_review,
            resolver
                .as_ref()
                .map(|r| r as &plan::ChatIdentityResolver<'_>),
        ))
    }

    async fn resolve_config(
        &self,
        pull_request: &PullRequestLocator,
        head_sha: &str,
    ) -> Result<ReviewConfig, EngineError> {
        if let Some(config) = &self.config {
            return Ok(config.clone());
        }

        let text = self
            .provider
            .fetch_config(
                &pull_request.owner,
                &pull_request.repo,
                head_sha,
                CONFIG_FILE,
            )
            .await?
            .ok_or(EngineError::MissingConfiguration)?;

        Ok(ReviewConfig::parse(&text)?)
    }

    async fn check_labels(
        &self,
        pull_request: &PullRequestLocator,
        config: &ReviewConfig,
    ) -> Result<(), EngineError> {
        let labels = self
            .provider
            .list_labels(&pull_request.owner, &pull_request.repo, pull_request.number)
            .await?;

        for label in &labels {
            if config.label_blacklist.contains(&label.name) {
                return Err(EngineError::LabelBlocked(label.name.clone()));
            }
        }

        if !config.label_whitelist.is_empty()
            && !labels
                .iter()
                .any(|label| config.label_whitelist.contains(&label.name))
        {
            return Err(EngineError::LabelNotPermitted);
        }

        Ok(())
    }
}

/// Adapts a [`PullRequestProvider`] to the per-file [`BlameSource`] the
/// aggregator consumes, pinning the repository and ref.
struct ProviderBlameSource<'a, P> {
    provider: &'a P,
    owner: &'a str,
    repo: &'a str,
    git_ref: &'a str,
}

#[async_trait]
impl<P: PullRequestProvider> BlameSource for ProviderBlameSource<'_, P> {
    async fn blame_for(
        &self,
        file: &PullRequestFile,
    ) -> Result<Option<Vec<BlameRange>>, PlatformError> {
        self.provider
            .get_blame(self.owner, self.repo, self.git_ref, &file.filename)
            .await
    }
}
