//! Post-selection heuristic adjustments.
//!
//! Two optional adjustments run after the base selection is built, each
//! gated on its own configuration knob and on the overall size gate.
//! Author diversity runs first; when it fires, authorship concentration
//! is skipped for the request so the two adjustments never fight over the
//! same slot.

use rand::Rng;
use tracing::debug;

use crate::blame::OwnershipLedger;
use crate::config::ReviewConfig;
use crate::eligibility::EligibilityFilter;
use crate::quota::Quota;
use crate::scoring::{Candidate, CandidateSource};

#[cfg(test)]
#[path = "heuristic_tests.rs"]
mod tests;

/// Applies the heuristic adjustments to a selection in progress.
///
/// Returns the fill target the later fallback/random stages should fill
/// to. The selection and the eligibility state are mutated in place;
/// logins dropped here become ineligible for every later stage.
pub fn apply<R: Rng>(
    config: &ReviewConfig,
    quota: &Quota,
    ledger: &OwnershipLedger,
    scored_pool: &[Candidate],
    selection: &mut Vec<Candidate>,
    eligibility: &mut EligibilityFilter<'_>,
    net_changed_lines: u64,
    rng: &mut R,
) -> u64 {
    if config.max_reviewers <= 1 {
        return quota.min_assignable;
    }

    if config.min_lines_changed_for_extra_reviewer > 0
        && net_changed_lines < config.min_lines_changed_for_extra_reviewer
    {
        debug!(
            net_changed_lines,
            threshold = config.min_lines_changed_for_extra_reviewer,
            "Change too small for heuristic adjustments"
        );
        return quota.min_assignable;
    }

    if let Some(target) = apply_diversity(config, quota, ledger, selection, eligibility, rng) {
        return target;
    }

    apply_concentration(config, quota, scored_pool, selection, eligibility);
    quota.min_assignable
}

/// Author diversity: when the change touches code written by too few
/// people, widen the reviewer pool by one when there is room, otherwise
/// swap one selected reviewer for a later random pick.
fn apply_diversity<R: Rng>(
    config: &ReviewConfig,
    quota: &Quota,
    ledger: &OwnershipLedger,
    selection: &mut Vec<Candidate>,
    eligibility: &mut EligibilityFilter<'_>,
    rng: &mut R,
) -> Option<u64> {
    if config.min_authors_of_changed_files == 0
        || ledger.unique_authors >= config.min_authors_of_changed_files
    {
        return None;
    }

    let current = selection.len() as u64;
    let desired = (current.max(quota.min_assignable) + 1).min(quota.max_assignable);

    if desired > current {
        debug!(
            unique_authors = ledger.unique_authors,
            desired, "Too few authors; widening the reviewer pool"
        );
        return Some(desired);
    }

    if !selection.is_empty() {
        let dropped = selection.remove(rng.gen_range(0..selection.len()));
        debug!(
            login = %dropped.login,
            "Too few authors; swapping a selected reviewer for a random pick"
        );
        eligibility.exclude(&dropped.login);
    }

    Some(quota.min_assignable)
}

/// Authorship concentration: when the top-ranked blame candidate owns
/// too much of the change, bring in the next-best scored candidate for
/// an outside view.
///
/// The trigger reads the scored pool, not the selection head, so a
/// forced path assignment sitting in front of the blame candidates does
/// not mask a concentrated owner.
fn apply_concentration(
    config: &ReviewConfig,
    quota: &Quota,
    scored_pool: &[Candidate],
    selection: &mut Vec<Candidate>,
    eligibility: &mut EligibilityFilter<'_>,
) {
    if config.min_percent_authorship_for_extra_reviewer == 0 {
        return;
    }

    let concentrated = scored_pool.first().is_some_and(|top| {
        top.ownership.unwrap_or(0.0) * 100.0
            >= config.min_percent_authorship_for_extra_reviewer as f64
    });
    if !concentrated {
        return;
    }

    let next_best = scored_pool.iter().skip(1).find(|candidate| {
        !selection.iter().any(|s| s.login == candidate.login)
            && eligibility.is_eligible(&candidate.login)
    });
    let Some(next_best) = next_best else {
        debug!("Authorship concentrated but no next-best candidate available");
        return;
    };

    if selection.len() as u64 >= quota.max_assignable {
        if let Some(evicted) = selection.pop() {
            eligibility.exclude(&evicted.login);
        }
    }

    let mut promoted = next_best.clone();
    promoted.source = CandidateSource::NextBest;
    debug!(login = %promoted.login, "Promoting next-best candidate");
    eligibility.select(&promoted.login);
    selection.push(promoted);
}
