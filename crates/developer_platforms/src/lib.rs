//! # Review Roster Developer Platforms
//!
//! Port traits and adapters for the version-control hosting platforms the
//! review engine talks to. The engine itself only ever sees the traits in
//! this crate; [`github`] provides the octocrab-backed implementation.

use async_trait::async_trait;

pub mod errors;

pub mod github;

pub mod models;

pub mod ttl;

use errors::Error;
use models::{BlameRange, Commit, Label, PullRequest, PullRequestFile};

/// Trait to fetch configuration files from remote repositories.
#[async_trait]
pub trait ConfigFetcher: Send + Sync {
    /// Fetch the content of a configuration file at the given path and ref.
    /// Returns `Ok(Some(content))` if found, `Ok(None)` if not found, or
    /// `Err` on error.
    async fn fetch_config(
        &self,
        repo_owner: &str,
        repo_name: &str,
        git_ref: &str,
        path: &str,
    ) -> Result<Option<String>, Error>;
}

/// Trait for delivering chat notifications about a review assignment.
///
/// Chat delivery is a separate collaborator from the hosting platform; the
/// payload is pre-rendered JSON so adapters stay format-agnostic.
#[async_trait]
pub trait ChatNotifier: Send + Sync {
    /// Deliver a notification payload to the given chat channel.
    async fn notify_chat(&self, channel: &str, payload: serde_json::Value) -> Result<(), Error>;
}

/// Trait for interacting with developer platforms that host pull requests.
///
/// Implementations provide both the read surface the engine plans from
/// (pull request metadata, changed files, commits, labels, blame) and the
/// write surface the plan executor drives (assignments, review requests,
/// comments).
///
/// # Example Implementation
///
/// ```rust,no_run
/// use review_roster_developer_platforms::{PullRequestProvider, errors::Error};
/// use review_roster_developer_platforms::models::{
///     BlameRange, Commit, Label, PullRequest, PullRequestFile,
/// };
/// use async_trait::async_trait;
///
/// #[derive(Debug)]
/// struct MyProvider {
///     token: String,
/// }
///
/// #[async_trait]
/// impl PullRequestProvider for MyProvider {
///     async fn get_pull_request(
///         &self,
///         repo_owner: &str,
///         repo_name: &str,
///         pr_number: u64,
///     ) -> Result<PullRequest, Error> {
///         // Implementation to fetch the PR from the platform API
///         # unimplemented!()
///     }
///
///     // Implement other required methods...
///     # async fn get_pull_request_files(&self, _: &str, _: &str, _: u64) -> Result<Vec<PullRequestFile>, Error> { unimplemented!() }
///     # async fn get_pull_request_commits(&self, _: &str, _: &str, _: u64) -> Result<Vec<Commit>, Error> { unimplemented!() }
///     # async fn list_labels(&self, _: &str, _: &str, _: u64) -> Result<Vec<Label>, Error> { unimplemented!() }
///     # async fn get_requested_reviewers(&self, _: &str, _: &str, _: u64) -> Result<Vec<String>, Error> { unimplemented!() }
///     # async fn get_blame(&self, _: &str, _: &str, _: &str, _: &str) -> Result<Option<Vec<BlameRange>>, Error> { unimplemented!() }
///     # async fn assign_users(&self, _: &str, _: &str, _: u64, _: &[String]) -> Result<(), Error> { unimplemented!() }
///     # async fn unassign_users(&self, _: &str, _: &str, _: u64, _: &[String]) -> Result<(), Error> { unimplemented!() }
///     # async fn create_review_requests(&self, _: &str, _: &str, _: u64, _: &[String]) -> Result<(), Error> { unimplemented!() }
///     # async fn delete_review_requests(&self, _: &str, _: &str, _: u64, _: &[String]) -> Result<(), Error> { unimplemented!() }
///     # async fn add_comment(&self, _: &str, _: &str, _: u64, _: &str) -> Result<(), Error> { unimplemented!() }
/// }
/// ```
#[async_trait]
pub trait PullRequestProvider: Send + Sync {
    /// Retrieves a pull request from the Git provider.
    async fn get_pull_request(
        &self,
        repo_owner: &str,
        repo_name: &str,
        pr_number: u64,
    ) -> Result<PullRequest, Error>;

    /// Gets the list of files changed in a pull request, with line change
    /// counts and file status information.
    async fn get_pull_request_files(
        &self,
        repo_owner: &str,
        repo_name: &str,
        pr_number: u64,
    ) -> Result<Vec<PullRequestFile>, Error>;

    /// Gets the commits on the pull request branch.
    ///
    /// Used for the commit-author exclusion: anyone who committed to the
    /// change is never selected to review it.
    async fn get_pull_request_commits(
        &self,
        repo_owner: &str,
        repo_name: &str,
        pr_number: u64,
    ) -> Result<Vec<Commit>, Error>;

    /// Lists all labels on a pull request.
    async fn list_labels(
        &self,
        repo_owner: &str,
        repo_name: &str,
        pr_number: u64,
    ) -> Result<Vec<Label>, Error>;

    /// Lists the logins with an outstanding review request on the pull
    /// request. The assignee-based equivalent comes from
    /// [`PullRequest::assignees`](models::PullRequest).
    async fn get_requested_reviewers(
        &self,
        repo_owner: &str,
        repo_name: &str,
        pr_number: u64,
    ) -> Result<Vec<String>, Error>;

    /// Fetches the per-file ownership history for a file at a ref.
    ///
    /// Returns `Ok(None)` when the platform has no blame data for the
    /// file; callers treat that as "no ownership data", not a failure.
    async fn get_blame(
        &self,
        repo_owner: &str,
        repo_name: &str,
        git_ref: &str,
        path: &str,
    ) -> Result<Option<Vec<BlameRange>>, Error>;

    /// Assigns users to a pull request.
    async fn assign_users(
        &self,
        repo_owner: &str,
        repo_name: &str,
        pr_number: u64,
        logins: &[String],
    ) -> Result<(), Error>;

    /// Removes assignees from a pull request.
    async fn unassign_users(
        &self,
        repo_owner: &str,
        repo_name: &str,
        pr_number: u64,
        logins: &[String],
    ) -> Result<(), Error>;

    /// Requests reviews from the given users.
    async fn create_review_requests(
        &self,
        repo_owner: &str,
        repo_name: &str,
        pr_number: u64,
        logins: &[String],
    ) -> Result<(), Error>;

    /// Withdraws outstanding review requests for the given users.
    async fn delete_review_requests(
        &self,
        repo_owner: &str,
        repo_name: &str,
        pr_number: u64,
        logins: &[String],
    ) -> Result<(), Error>;

    /// Adds a comment to a pull request.
    async fn add_comment(
        &self,
        repo_owner: &str,
        repo_name: &str,
        pr_number: u64,
        comment: &str,
    ) -> Result<(), Error>;
}
