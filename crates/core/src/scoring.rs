//! Candidate ranking.
//!
//! Scoring turns the ownership ledger into an ordered candidate pool. The
//! sort is stable over the ledger's alphabetical login order, so equal
//! scores always come out in the same order and a seeded run is
//! reproducible end to end.

use serde::{Deserialize, Serialize};

use crate::blame::OwnershipLedger;

#[cfg(test)]
#[path = "scoring_tests.rs"]
mod tests;

/// How a candidate entered the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CandidateSource {
    /// Forced by a path assignment rule
    Assignment,
    /// Scored from blame history
    Blame,
    /// Drawn from a path fallback pool
    Fallback,
    /// Drawn from the configured reviewer roster at random
    Random,
    /// Promoted by the authorship-concentration adjustment
    NextBest,
}

/// A selected or selectable reviewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Platform login
    pub login: String,
    /// Total lines attributed to this login across the scored files
    pub count: u64,
    /// How the candidate was (or would be) selected
    pub source: CandidateSource,
    /// Mean per-file ownership fraction, when blame data produced one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ownership: Option<f64>,
}

impl Candidate {
    /// A candidate that did not come from blame scoring.
    pub fn unscored(login: impl Into<String>, source: CandidateSource) -> Self {
        Self {
            login: login.into(),
            count: 0,
            source,
            ownership: None,
        }
    }
}

/// The ranking key applied to blame candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringMode {
    /// Rank by total attributed lines
    TotalLines,
    /// Rank by attributed lines weighted by mean ownership fraction
    Ownership,
}

/// Ranks every login in the ledger, best candidate first.
pub fn rank(ledger: &OwnershipLedger, mode: ScoringMode) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = ledger
        .lines_changed
        .iter()
        .map(|(login, count)| Candidate {
            login: login.clone(),
            count: *count,
            source: CandidateSource::Blame,
            ownership: ledger
                .has_ownership_data()
                .then(|| ledger.average_ownership(login)),
        })
        .collect();

    match mode {
        ScoringMode::TotalLines => {
            candidates.sort_by(|a, b| b.count.cmp(&a.count));
        }
        ScoringMode::Ownership => {
            candidates.sort_by(|a, b| score(b).total_cmp(&score(a)));
        }
    }

    candidates
}

fn score(candidate: &Candidate) -> f64 {
    candidate.count as f64 * candidate.ownership.unwrap_or(0.0)
}
