//! GitHub implementation of the platform ports.
//!
//! Uses octocrab for REST calls and the GraphQL API for per-file blame.
//! The adapter expects an already-authenticated [`Octocrab`] client;
//! building and authenticating that client is the caller's concern.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use octocrab::Octocrab;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument, warn};

use crate::{
    errors::Error,
    models::{BlameRange, Commit, FileStatus, Label, PullRequest, PullRequestFile, User},
    ttl::{RepoPathKey, TtlCache},
    ConfigFetcher, PullRequestProvider,
};

#[cfg(test)]
#[path = "github_tests.rs"]
mod tests;

/// How long fetched configuration files stay memoized.
const CONFIG_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// How long fetched blame data stays memoized.
const BLAME_CACHE_TTL: Duration = Duration::from_secs(30 * 60);

/// GraphQL query resolving blame ranges for one file at one commit.
const BLAME_QUERY: &str = r#"
query ($owner: String!, $repo: String!, $sha: GitObjectID!, $path: String!) {
  repository(owner: $owner, name: $repo) {
    object(oid: $sha) {
      ... on Commit {
        blame(path: $path) {
          ranges {
            startingLine
            endingLine
            age
            commit {
              author {
                user {
                  login
                }
              }
            }
          }
        }
      }
    }
  }
}
"#;

#[derive(Debug, Deserialize)]
struct ApiUser {
    login: String,
}

#[derive(Debug, Deserialize)]
struct ApiPullRequest {
    number: u64,
    title: String,
    body: Option<String>,
    state: String,
    user: Option<ApiUser>,
    #[serde(default)]
    assignees: Vec<ApiUser>,
    head: ApiRef,
}

#[derive(Debug, Deserialize)]
struct ApiRef {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct ApiFile {
    filename: String,
    status: String,
    changes: u64,
    additions: u64,
    deletions: u64,
}

#[derive(Debug, Deserialize)]
struct ApiCommit {
    author: Option<ApiUser>,
}

#[derive(Debug, Deserialize)]
struct ApiLabel {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ApiRequestedReviewers {
    #[serde(default)]
    users: Vec<ApiUser>,
}

#[derive(Debug, Deserialize)]
struct ApiContent {
    content: String,
}

/// Whether a failure is the API reporting a missing resource, as opposed
/// to a transport or auth failure.
fn is_not_found(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::GitHub { source, .. } if source.status_code.as_u16() == 404
    )
}

fn parse_status(status: &str) -> FileStatus {
    match status {
        "added" => FileStatus::Added,
        "modified" => FileStatus::Modified,
        "removed" => FileStatus::Removed,
        _ => FileStatus::Other,
    }
}

/// Converts one GraphQL blame payload into validated [`BlameRange`]s.
///
/// Ranges whose commit has no resolvable platform user are dropped, the
/// same way the blame view on the website omits unlinked authors.
fn blame_ranges_from_graphql(blame: &serde_json::Value) -> Result<Vec<BlameRange>, Error> {
    let ranges = blame
        .get("ranges")
        .and_then(|r| r.as_array())
        .ok_or(Error::InvalidResponse)?;

    let mut out = Vec::new();
    for range in ranges {
        let login = range
            .pointer("/commit/author/user/login")
            .and_then(|l| l.as_str());
        let login = match login {
            Some(l) => l,
            None => continue,
        };

        let starting = range
            .get("startingLine")
            .and_then(|v| v.as_u64())
            .ok_or(Error::InvalidResponse)?;
        let ending = range
            .get("endingLine")
            .and_then(|v| v.as_u64())
            .ok_or(Error::InvalidResponse)?;
        let age = range
            .get("age")
            .and_then(|v| v.as_u64())
            .ok_or(Error::InvalidResponse)?;

        if ending < starting {
            return Err(Error::InvalidData(format!(
                "blame range ends before it starts: {starting}..{ending}"
            )));
        }

        out.push(BlameRange::new(login, ending - starting + 1, age)?);
    }

    Ok(out)
}

/// GitHub-backed provider for pull request data and mutations.
#[derive(Debug)]
pub struct GitHubProvider {
    client: Octocrab,
    config_cache: TtlCache<RepoPathKey, Option<String>>,
    blame_cache: TtlCache<RepoPathKey, Option<Vec<BlameRange>>>,
}

impl GitHubProvider {
    /// Wraps an authenticated octocrab client.
    pub fn new(client: Octocrab) -> Self {
        Self {
            client,
            config_cache: TtlCache::new(CONFIG_CACHE_TTL),
            blame_cache: TtlCache::new(BLAME_CACHE_TTL),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, route: String) -> Result<T, Error> {
        self.client
            .get(&route, None::<&()>)
            .await
            .map_err(|e| Error::ApiError(format!("GET {route}: {e}")))
    }

    async fn fetch_blame_live(
        &self,
        repo_owner: &str,
        repo_name: &str,
        git_ref: &str,
        path: &str,
    ) -> Result<Option<Vec<BlameRange>>, Error> {
        let payload = json!({
            "query": BLAME_QUERY,
            "variables": {
                "owner": repo_owner,
                "repo": repo_name,
                "sha": git_ref,
                "path": path,
            },
        });

        let response: serde_json::Value = self
            .client
            .graphql(&payload)
            .await
            .map_err(|e| Error::ApiError(format!("blame query for {path}: {e}")))?;

        let blame = response.pointer("/data/repository/object/blame");
        match blame {
            Some(blame) if !blame.is_null() => Ok(Some(blame_ranges_from_graphql(blame)?)),
            _ => Ok(None),
        }
    }
}

#[async_trait]
impl PullRequestProvider for GitHubProvider {
    #[instrument(skip(self))]
    async fn get_pull_request(
        &self,
        repo_owner: &str,
        repo_name: &str,
        pr_number: u64,
    ) -> Result<PullRequest, Error> {
        let pr: ApiPullRequest = self
            .get_json(format!("/repos/{repo_owner}/{repo_name}/pulls/{pr_number}"))
            .await?;

        Ok(PullRequest {
            number: pr.number,
            title: pr.title,
            body: pr.body,
            state: pr.state,
            author: pr.user.map(|u| User { login: u.login }),
            assignees: pr
                .assignees
                .into_iter()
                .map(|u| User { login: u.login })
                .collect(),
            head_sha: pr.head.sha,
        })
    }

    #[instrument(skip(self))]
    async fn get_pull_request_files(
        &self,
        repo_owner: &str,
        repo_name: &str,
        pr_number: u64,
    ) -> Result<Vec<PullRequestFile>, Error> {
        let files: Vec<ApiFile> = self
            .get_json(format!(
                "/repos/{repo_owner}/{repo_name}/pulls/{pr_number}/files?per_page=100"
            ))
            .await?;

        debug!(
            repository_owner = repo_owner,
            repository = repo_name,
            pull_request = pr_number,
            count = files.len(),
            "Fetched changed files"
        );

        Ok(files
            .into_iter()
            .map(|f| PullRequestFile {
                status: parse_status(&f.status),
                filename: f.filename,
                changes: f.changes,
                additions: f.additions,
                deletions: f.deletions,
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn get_pull_request_commits(
        &self,
        repo_owner: &str,
        repo_name: &str,
        pr_number: u64,
    ) -> Result<Vec<Commit>, Error> {
        let commits: Vec<ApiCommit> = self
            .get_json(format!(
                "/repos/{repo_owner}/{repo_name}/pulls/{pr_number}/commits?per_page=100"
            ))
            .await?;

        Ok(commits
            .into_iter()
            .map(|c| Commit {
                author: c.author.map(|u| User { login: u.login }),
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn list_labels(
        &self,
        repo_owner: &str,
        repo_name: &str,
        pr_number: u64,
    ) -> Result<Vec<Label>, Error> {
        let labels: Vec<ApiLabel> = self
            .get_json(format!(
                "/repos/{repo_owner}/{repo_name}/issues/{pr_number}/labels"
            ))
            .await?;

        Ok(labels.into_iter().map(|l| Label { name: l.name }).collect())
    }

    #[instrument(skip(self))]
    async fn get_requested_reviewers(
        &self,
        repo_owner: &str,
        repo_name: &str,
        pr_number: u64,
    ) -> Result<Vec<String>, Error> {
        let requested: ApiRequestedReviewers = self
            .get_json(format!(
                "/repos/{repo_owner}/{repo_name}/pulls/{pr_number}/requested_reviewers"
            ))
            .await?;

        Ok(requested.users.into_iter().map(|u| u.login).collect())
    }

    #[instrument(skip(self))]
    async fn get_blame(
        &self,
        repo_owner: &str,
        repo_name: &str,
        git_ref: &str,
        path: &str,
    ) -> Result<Option<Vec<BlameRange>>, Error> {
        let key = RepoPathKey::new(repo_owner, repo_name, git_ref, path);
        if let Some(cached) = self.blame_cache.get(&key).await {
            debug!(path, "Serving blame from cache");
            return Ok(cached);
        }

        let ranges = self
            .fetch_blame_live(repo_owner, repo_name, git_ref, path)
            .await?;

        self.blame_cache.insert(key, ranges.clone()).await;
        Ok(ranges)
    }

    #[instrument(skip(self))]
    async fn assign_users(
        &self,
        repo_owner: &str,
        repo_name: &str,
        pr_number: u64,
        logins: &[String],
    ) -> Result<(), Error> {
        let route = format!("/repos/{repo_owner}/{repo_name}/issues/{pr_number}/assignees");
        let _: serde_json::Value = self
            .client
            .post(&route, Some(&json!({ "assignees": logins })))
            .await
            .map_err(|e| Error::FailedToUpdatePullRequest(format!("assign: {e}")))?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn unassign_users(
        &self,
        repo_owner: &str,
        repo_name: &str,
        pr_number: u64,
        logins: &[String],
    ) -> Result<(), Error> {
        let route = format!("/repos/{repo_owner}/{repo_name}/issues/{pr_number}/assignees");
        let _: serde_json::Value = self
            .client
            .delete(&route, Some(&json!({ "assignees": logins })))
            .await
            .map_err(|e| Error::FailedToUpdatePullRequest(format!("unassign: {e}")))?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn create_review_requests(
        &self,
        repo_owner: &str,
        repo_name: &str,
        pr_number: u64,
        logins: &[String],
    ) -> Result<(), Error> {
        let route =
            format!("/repos/{repo_owner}/{repo_name}/pulls/{pr_number}/requested_reviewers");
        let _: serde_json::Value = self
            .client
            .post(&route, Some(&json!({ "reviewers": logins })))
            .await
            .map_err(|e| Error::FailedToUpdatePullRequest(format!("request reviews: {e}")))?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_review_requests(
        &self,
        repo_owner: &str,
        repo_name: &str,
        pr_number: u64,
        logins: &[String],
    ) -> Result<(), Error> {
        let route =
            format!("/repos/{repo_owner}/{repo_name}/pulls/{pr_number}/requested_reviewers");
        let _: serde_json::Value = self
            .client
            .delete(&route, Some(&json!({ "reviewers": logins })))
            .await
            .map_err(|e| Error::FailedToUpdatePullRequest(format!("withdraw reviews: {e}")))?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn add_comment(
        &self,
        repo_owner: &str,
        repo_name: &str,
        pr_number: u64,
        comment: &str,
    ) -> Result<(), Error> {
        let route = format!("/repos/{repo_owner}/{repo_name}/issues/{pr_number}/comments");
        let _: serde_json::Value = self
            .client
            .post(&route, Some(&json!({ "body": comment })))
            .await
            .map_err(|e| Error::FailedToUpdatePullRequest(format!("comment: {e}")))?;
        Ok(())
    }
}

#[async_trait]
impl ConfigFetcher for GitHubProvider {
    #[instrument(skip(self))]
    async fn fetch_config(
        &self,
        repo_owner: &str,
        repo_name: &str,
        git_ref: &str,
        path: &str,
    ) -> Result<Option<String>, Error> {
        let key = RepoPathKey::new(repo_owner, repo_name, git_ref, path);
        if let Some(cached) = self.config_cache.get(&key).await {
            debug!(path, "Serving repository config from cache");
            return Ok(cached);
        }

        let route = format!("/repos/{repo_owner}/{repo_name}/contents/{path}?ref={git_ref}");
        let content: Result<ApiContent, _> = self.client.get(&route, None::<&()>).await;

        let decoded = match content {
            Ok(content) => {
                let raw = content.content.replace(['\n', '\r'], "");
                let bytes = base64::engine::general_purpose::STANDARD
                    .decode(raw)
                    .map_err(|_| Error::InvalidResponse)?;
                Some(String::from_utf8(bytes).map_err(|_| Error::InvalidResponse)?)
            }
            Err(e) if is_not_found(&e) => {
                // The file being absent is expected for repositories that
                // configure review-roster out of band.
                debug!(path, "No repository config at this ref");
                None
            }
            Err(e) => {
                // Transient failures are not memoized; the next request
                // fetches live again.
                warn!(path, error = %e, "Repository config not readable");
                return Ok(None);
            }
        };

        self.config_cache.insert(key, decoded.clone()).await;
        Ok(decoded)
    }
}
