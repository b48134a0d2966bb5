//! Candidate eligibility.
//!
//! A single mutable filter tracks the selection as it grows, so the same
//! predicate gates every stage: forced path assignments, blame scoring,
//! fallback fill and random fill. Re-evaluating against the current
//! partial selection is what guarantees no login is chosen twice.

use std::collections::BTreeSet;

use review_roster_developer_platforms::models::Commit;

use crate::config::ReviewConfig;

#[cfg(test)]
#[path = "eligibility_tests.rs"]
mod tests;

/// The eligibility predicate plus the mutable selection state it closes
/// over.
#[derive(Debug)]
pub struct EligibilityFilter<'a> {
    config: &'a ReviewConfig,
    author: &'a str,
    committers: BTreeSet<String>,
    selected: BTreeSet<String>,
    excluded: BTreeSet<String>,
}

impl<'a> EligibilityFilter<'a> {
    /// Builds the filter for one review request.
    ///
    /// `commits` drives the commit-author exclusion; the exclusion only
    /// applies when commit data was supplied. `excluded` seeds logins
    /// that must not be picked at all, e.g. the assignees a retry-review
    /// invocation is about to unassign.
    pub fn new(
        config: &'a ReviewConfig,
        author: &'a str,
        commits: &[Commit],
        excluded: impl IntoIterator<Item = String>,
    ) -> Self {
        let committers = commits
            .iter()
            .filter_map(|commit| commit.author.as_ref())
            .map(|user| user.login.clone())
            .collect();

        Self {
            config,
            author,
            committers,
            selected: BTreeSet::new(),
            excluded: excluded.into_iter().collect(),
        }
    }

    /// Whether `login` may be selected right now.
    pub fn is_eligible(&self, login: &str) -> bool {
        let is_selected = self.selected.contains(login);
        let is_committer = self.committers.contains(login);
        let is_author = login == self.author;
        let is_blacklisted = self.config.review_blacklist.contains(login);
        let is_excluded = self.excluded.contains(login);
        let is_unreachable =
            self.config.require_notification && !self.config.reviewers.contains_key(login);

        !is_selected
            && !is_committer
            && !is_author
            && !is_blacklisted
            && !is_excluded
            && !is_unreachable
    }

    /// Marks `login` as selected, consuming its eligibility.
    pub fn select(&mut self, login: &str) {
        self.selected.insert(login.to_string());
    }

    /// Bars `login` from any further selection, including random fill.
    pub fn exclude(&mut self, login: &str) {
        self.selected.remove(login);
        self.excluded.insert(login.to_string());
    }
}
