//! # Models
//!
//! Wire-level data models shared between the review engine and the
//! platform adapters: pull requests, changed files, blame ranges, commits
//! and labels. They are serializable so they can be lifted straight out of
//! platform API responses.

use serde::{Deserialize, Serialize};

use crate::errors::Error;

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;

/// A platform user, identified by login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// The user's login name
    pub login: String,
}

/// Represents a pull request from a Git provider.
///
/// # Examples
///
/// ```
/// use review_roster_developer_platforms::models::{PullRequest, User};
///
/// let pr = PullRequest {
///     number: 123,
///     title: "Add login flow".to_string(),
///     body: Some("See the design doc.".to_string()),
///     state: "open".to_string(),
///     author: Some(User { login: "alice".to_string() }),
///     assignees: Vec::new(),
///     head_sha: "abc123".to_string(),
/// };
/// assert!(pr.is_open());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    /// The pull request number
    pub number: u64,

    /// The title of the pull request
    pub title: String,

    /// The description/body of the pull request, if any
    pub body: Option<String>,

    /// The state of the pull request ("open", "closed", ...)
    pub state: String,

    /// The author of the pull request
    pub author: Option<User>,

    /// Users currently assigned to the pull request
    pub assignees: Vec<User>,

    /// The commit sha at the head of the pull request branch
    pub head_sha: String,
}

impl PullRequest {
    /// Whether the pull request is still open.
    pub fn is_open(&self) -> bool {
        self.state == "open"
    }
}

/// The change status of a file in a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    /// The file was added by the change
    Added,
    /// The file was modified by the change
    Modified,
    /// The file was removed by the change
    Removed,
    /// Any other platform-specific status (renamed, copied, ...)
    #[serde(other)]
    Other,
}

/// A single file changed by a pull request, with line change counts.
///
/// Only `modified` files participate in blame-based scoring; `removed`
/// files are excluded from the net changed-line count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestFile {
    /// Path of the file relative to the repository root
    pub filename: String,

    /// The change status of the file
    pub status: FileStatus,

    /// Total number of changed lines
    pub changes: u64,

    /// Number of added lines
    pub additions: u64,

    /// Number of deleted lines
    pub deletions: u64,
}

/// A contiguous range of lines attributed to one author by blame.
///
/// Ranges are validated at construction: the login must be non-empty and
/// the range must cover at least one line. `age` counts commits since the
/// range was created, so smaller means more recent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlameRange {
    /// Login of the author the lines are attributed to
    pub login: String,

    /// Number of lines attributed (>= 1)
    pub count: u64,

    /// Commits since the range was created; smaller is more recent
    pub age: u64,
}

impl BlameRange {
    /// Builds a validated blame range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] when the login is empty or the line
    /// count is below 1.
    pub fn new(login: impl Into<String>, count: u64, age: u64) -> Result<Self, Error> {
        let login = login.into();
        if login.is_empty() {
            return Err(Error::InvalidData(
                "blame range is missing a login".to_string(),
            ));
        }
        if count < 1 {
            return Err(Error::InvalidData(
                "blame range count is below 1".to_string(),
            ));
        }

        Ok(Self { login, count, age })
    }
}

/// A commit on the pull request branch.
///
/// Commits without a resolvable author (e.g. unlinked email addresses)
/// carry `None` and are skipped by the commit-author exclusion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commit {
    /// The author of the commit, when the platform can resolve one
    pub author: Option<User>,
}

/// Represents a label on a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// The name of the label
    pub name: String,
}
