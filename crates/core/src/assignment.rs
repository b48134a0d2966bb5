//! The reviewer selection pipeline.
//!
//! Stages run in a fixed order: change-set preparation, quota, forced
//! path assignments, blame scoring, heuristic adjustments, then the
//! fallback and random fills. Every stage draws from the same
//! [`EligibilityFilter`], and all randomness flows through the single RNG
//! the caller provides, so a seeded run is fully deterministic.

use rand::seq::SliceRandom;
use rand::Rng;
use review_roster_developer_platforms::models::{Commit, PullRequestFile};
use tracing::{debug, instrument};

use crate::blame::{self, BlameSource};
use crate::config::ReviewConfig;
use crate::eligibility::EligibilityFilter;
use crate::errors::EngineError;
use crate::heuristic;
use crate::paths;
use crate::quota;
use crate::scoring::{self, Candidate, CandidateSource};

#[cfg(test)]
#[path = "assignment_tests.rs"]
mod tests;

/// Everything the selection pipeline needs to know about one pull
/// request.
#[derive(Debug, Clone, Default)]
pub struct AssignmentInput {
    /// Changed files, before blacklist filtering
    pub files: Vec<PullRequestFile>,
    /// Commits on the pull request; empty when unavailable
    pub commits: Vec<Commit>,
    /// Logins currently assigned (or requested) as reviewers
    pub existing_assignees: Vec<String>,
    /// The pull request author's login
    pub author: String,
    /// Logins barred from selection for this run
    pub excluded: Vec<String>,
}

/// Selects reviewers for one pull request.
///
/// # Errors
///
/// [`EngineError::MaximumReviewersAssigned`] /
/// [`EngineError::MinimumReviewersAssigned`] when the quota is already
/// met, and [`EngineError::NoReviewersFound`] when every stage comes up
/// empty.
#[instrument(skip_all, fields(author = %input.author, files = input.files.len()))]
pub async fn select_reviewers<S: BlameSource, R: Rng>(
    config: &ReviewConfig,
    input: &AssignmentInput,
    source: &S,
    rng: &mut R,
) -> Result<Vec<Candidate>, EngineError> {
    let changeset = blame::prepare_changeset(config, input.files.clone())?;

    let existing: Vec<&String> = input
        .existing_assignees
        .iter()
        .filter(|login| **login != input.author)
        .collect();

    let quota = quota::compute(
        config,
        existing.len() as u64,
        changeset.files.len() as u64,
        changeset.net_changed_lines,
    )?;
    debug!(
        max_assignable = quota.max_assignable,
        min_assignable = quota.min_assignable,
        dynamic = quota.dynamic,
        "Computed reviewer quota"
    );

    let mut eligibility = EligibilityFilter::new(
        config,
        &input.author,
        &input.commits,
        input.excluded.iter().cloned(),
    );
    for login in existing {
        eligibility.select(login);
    }

    // Forced path assignments come first and survive truncation.
    let mut forced = Vec::new();
    for keyed in paths::compile_keyed_rules(&config.review_path_assignments)? {
        if !keyed.rule.matches_any(&changeset.files) {
            continue;
        }
        for login in &keyed.logins {
            if eligibility.is_eligible(login) {
                eligibility.select(login);
                forced.push(Candidate::unscored(login, CandidateSource::Assignment));
            }
        }
    }
    forced.shuffle(rng);

    let ledger = blame::aggregate_blame(source, &changeset.top_modified, &eligibility).await;
    let scored_pool = scoring::rank(&ledger, config.scoring_mode());

    let mut selection = forced;
    for candidate in &scored_pool {
        if selection.len() as u64 >= quota.max_assignable {
            break;
        }
        if eligibility.is_eligible(&candidate.login) {
            eligibility.select(&candidate.login);
            selection.push(candidate.clone());
        }
    }
    selection.truncate(quota.max_assignable as usize);

    let fill_target = heuristic::apply(
        config,
        &quota,
        &ledger,
        &scored_pool,
        &mut selection,
        &mut eligibility,
        changeset.net_changed_lines,
        rng,
    );

    if (selection.len() as u64) < fill_target
        && config.assign_min_reviewers_randomly
        && !config.review_path_fallbacks.is_empty()
    {
        fill_from_fallbacks(
            config,
            &changeset.files,
            fill_target,
            &mut selection,
            &mut eligibility,
            rng,
        )?;
    }

    if (selection.len() as u64) < fill_target && config.assign_min_reviewers_randomly {
        fill_from_roster(config, fill_target, &mut selection, &mut eligibility, rng);
    }

    if selection.is_empty() {
        return Err(EngineError::NoReviewersFound);
    }

    Ok(selection)
}

/// Fills from the fallback pools whose path rules match the change.
fn fill_from_fallbacks<R: Rng>(
    config: &ReviewConfig,
    files: &[PullRequestFile],
    fill_target: u64,
    selection: &mut Vec<Candidate>,
    eligibility: &mut EligibilityFilter<'_>,
    rng: &mut R,
) -> Result<(), EngineError> {
    let mut pool = Vec::new();
    for keyed in paths::compile_keyed_rules(&config.review_path_fallbacks)? {
        if !keyed.rule.matches_any(files) {
            continue;
        }
        for login in &keyed.logins {
            if eligibility.is_eligible(login) {
                eligibility.select(login);
                pool.push(Candidate::unscored(login, CandidateSource::Fallback));
            }
        }
    }

    pool.shuffle(rng);
    let shortfall = (fill_target as usize).saturating_sub(selection.len());
    for candidate in pool.into_iter().take(shortfall) {
        debug!(login = %candidate.login, "Filling from path fallback pool");
        selection.push(candidate);
    }

    Ok(())
}

/// Fills from the configured reviewer roster at random.
fn fill_from_roster<R: Rng>(
    config: &ReviewConfig,
    fill_target: u64,
    selection: &mut Vec<Candidate>,
    eligibility: &mut EligibilityFilter<'_>,
    rng: &mut R,
) {
    let mut pool = Vec::new();
    for login in config.reviewers.keys() {
        if eligibility.is_eligible(login) {
            eligibility.select(login);
            pool.push(Candidate::unscored(login, CandidateSource::Random));
        }
    }

    pool.shuffle(rng);
    let shortfall = (fill_target as usize).saturating_sub(selection.len());
    for candidate in pool.into_iter().take(shortfall) {
        debug!(login = %candidate.login, "Filling from reviewer roster");
        selection.push(candidate);
    }
}
