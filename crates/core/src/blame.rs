//! Changed-file preparation and blame aggregation.
//!
//! The change set is cleaned up first: blacklisted files dropped, the net
//! changed-line count computed over non-removed files, and the modified
//! files ranked by churn and truncated to `max_files`. Blame for the
//! surviving files is fetched concurrently, one task per file; the join
//! preserves per-file association and a failed or empty fetch degrades to
//! "no ownership data" for that file without aborting the rest.

use std::collections::BTreeMap;

use async_trait::async_trait;
use futures::future::join_all;
use review_roster_developer_platforms::errors::Error as PlatformError;
use review_roster_developer_platforms::models::{BlameRange, FileStatus, PullRequestFile};
use tracing::warn;

use crate::config::ReviewConfig;
use crate::eligibility::EligibilityFilter;
use crate::errors::ConfigError;
use crate::paths;

#[cfg(test)]
#[path = "blame_tests.rs"]
mod tests;

/// Share of the most recent eligible ranges counted toward ownership.
/// Discounts stale authorship: people who wrote the oldest quarter of a
/// file's surviving lines are poor bets for a useful review.
const RECENT_BLAME_SHARE: f64 = 0.75;

/// Port for fetching per-file ownership history.
///
/// Owned by the external platform collaborator; `Ok(None)` means the
/// platform has no blame for that file.
#[async_trait]
pub trait BlameSource: Send + Sync {
    /// Fetch blame ranges for one changed file.
    async fn blame_for(&self, file: &PullRequestFile)
        -> Result<Option<Vec<BlameRange>>, PlatformError>;
}

/// The cleaned-up view of a pull request's changed files.
#[derive(Debug, Clone)]
pub struct ChangeSet {
    /// All changed files that survived the file blacklist
    pub files: Vec<PullRequestFile>,
    /// Modified files ranked by churn, truncated to `max_files`
    pub top_modified: Vec<PullRequestFile>,
    /// `|Σ(additions − deletions)|` over non-removed files
    pub net_changed_lines: u64,
}

/// Prepares the change set for scoring.
///
/// # Errors
///
/// [`ConfigError::InvalidGlob`] when a file-blacklist pattern fails to
/// compile (normally caught at configuration resolution already).
pub fn prepare_changeset(
    config: &ReviewConfig,
    files: Vec<PullRequestFile>,
) -> Result<ChangeSet, ConfigError> {
    let blacklist = paths::compile_rules(&config.file_blacklist)?;

    let files: Vec<PullRequestFile> = files
        .into_iter()
        .filter(|file| !paths::any_rule_matches(&blacklist, &file.filename))
        .collect();

    let net: i64 = files
        .iter()
        .filter(|file| file.status != FileStatus::Removed)
        .map(|file| file.additions as i64 - file.deletions as i64)
        .sum();

    let mut modified: Vec<PullRequestFile> = files
        .iter()
        .filter(|file| file.status == FileStatus::Modified)
        .cloned()
        .collect();
    modified.sort_by(|a, b| b.changes.cmp(&a.changes));

    if config.max_files > 0 {
        modified.truncate(config.max_files as usize);
    }

    Ok(ChangeSet {
        files,
        top_modified: modified,
        net_changed_lines: net.unsigned_abs(),
    })
}

/// Aggregated ownership statistics across the scored files.
#[derive(Debug, Default)]
pub struct OwnershipLedger {
    /// Total attributed lines per login
    pub lines_changed: BTreeMap<String, u64>,
    /// Number of distinct logins that contributed any counted blame
    pub unique_authors: u64,
    ownership_sums: BTreeMap<String, f64>,
    files_with_ownership: u64,
}

impl OwnershipLedger {
    /// Records one file's counted blame ranges.
    pub(crate) fn record_file(&mut self, counted: &[BlameRange]) {
        let total: u64 = counted.iter().map(|range| range.count).sum();
        if total == 0 {
            return;
        }

        self.files_with_ownership += 1;

        let mut per_login: BTreeMap<&str, u64> = BTreeMap::new();
        for range in counted {
            *per_login.entry(range.login.as_str()).or_default() += range.count;
        }

        for (login, lines) in per_login {
            *self.lines_changed.entry(login.to_string()).or_default() += lines;
            let fraction = round3(lines as f64 / total as f64);
            *self.ownership_sums.entry(login.to_string()).or_default() += fraction;
        }
    }

    /// Mean per-file ownership fraction for `login`.
    ///
    /// Files with attributable ownership where the login owns nothing
    /// count as zero; files with no ownership data at all are excluded
    /// from the mean.
    pub fn average_ownership(&self, login: &str) -> f64 {
        if self.files_with_ownership == 0 {
            return 0.0;
        }

        let sum = self.ownership_sums.get(login).copied().unwrap_or(0.0);
        round3(sum / self.files_with_ownership as f64)
    }

    /// Whether any file produced ownership data.
    pub fn has_ownership_data(&self) -> bool {
        self.files_with_ownership > 0
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Fetches and aggregates blame for the given files.
///
/// Fetches run concurrently and are joined in file order. Eligibility is
/// evaluated per range against the current partial selection, so logins
/// already consumed by forced path assignments accrue nothing here.
pub async fn aggregate_blame<S: BlameSource>(
    source: &S,
    files: &[PullRequestFile],
    eligibility: &EligibilityFilter<'_>,
) -> OwnershipLedger {
    let fetches = join_all(files.iter().map(|file| source.blame_for(file))).await;

    let mut ledger = OwnershipLedger::default();

    for (file, fetched) in files.iter().zip(fetches) {
        let mut ranges = match fetched {
            Ok(Some(ranges)) => ranges,
            Ok(None) => continue,
            Err(e) => {
                warn!(
                    file = %file.filename,
                    error = %e,
                    "Blame fetch failed; continuing without ownership data for this file"
                );
                continue;
            }
        };

        ranges.sort_by(|a, b| a.age.cmp(&b.age));

        let usable: Vec<BlameRange> = ranges
            .into_iter()
            .filter(|range| eligibility.is_eligible(&range.login))
            .collect();

        let recent_count = (usable.len() as f64 * RECENT_BLAME_SHARE).ceil() as usize;
        ledger.record_file(&usable[..recent_count]);
    }

    ledger.unique_authors = ledger.lines_changed.len() as u64;
    ledger
}
