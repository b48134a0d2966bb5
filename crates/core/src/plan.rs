//! Plan generation.
//!
//! A plan is the full, ordered list of side effects a review run intends:
//! clearing stale reviewers first on a retry, then the assignment itself,
//! then one notification per configured channel. The plan is plain data
//! and serializes to JSON, so a caller can inspect or persist it before
//! anything touches the platform.

use serde::{Deserialize, Serialize};

use crate::config::{NotificationChannel, ReviewConfig};
use crate::scoring::Candidate;

#[cfg(test)]
#[path = "plan_tests.rs"]
mod tests;

/// Identifies the pull request a plan operates on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestLocator {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

/// One side effect of a review run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    /// Assign the selected reviewers as assignees
    AssignUsersToPullRequest {
        pull_request: PullRequestLocator,
        assignees: Vec<String>,
        reviewers: Vec<Candidate>,
    },
    /// Remove stale assignees before a retry assignment
    UnassignUsersFromPullRequest {
        pull_request: PullRequestLocator,
        assignees: Vec<String>,
    },
    /// Request reviews from the selected reviewers
    CreateReviewRequest {
        pull_request: PullRequestLocator,
        assignees: Vec<String>,
        reviewers: Vec<Candidate>,
    },
    /// Withdraw stale review requests before a retry assignment
    DeleteReviewRequests {
        pull_request: PullRequestLocator,
        assignees: Vec<String>,
    },
    /// Notify the selected reviewers on one channel
    Notify {
        pull_request: PullRequestLocator,
        channel: NotificationChannel,
        recipients: Vec<String>,
    },
}

/// The ordered list of actions for one review run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub actions: Vec<Action>,
}

/// Resolves a platform login to a chat identity, when one is known.
pub type ChatIdentityResolver<'a> = dyn Fn(&str) -> Option<String> + 'a;

/// Generates the action plan for a completed selection.
///
/// `prior_assignees` holds the reviewers a retry run is replacing; it is
/// only consulted when `retry` is set.
pub fn generate_plan(
    config: &ReviewConfig,
    pull_request: &PullRequestLocator,
    selection: &[Candidate],
    prior_assignees: &[String],
    retry: bool,
    chat_identities: Option<&ChatIdentityResolver<'_>>,
) -> Plan {
    let mut actions = Vec::new();
    let assignees: Vec<String> = selection.iter().map(|c| c.login.clone()).collect();

    if retry && !prior_assignees.is_empty() {
        actions.push(if config.use_review_requests {
            Action::DeleteReviewRequests {
                pull_request: pull_request.clone(),
                assignees: prior_assignees.to_vec(),
            }
        } else {
            Action::UnassignUsersFromPullRequest {
                pull_request: pull_request.clone(),
                assignees: prior_assignees.to_vec(),
            }
        });
    }

    actions.push(if config.use_review_requests {
        Action::CreateReviewRequest {
            pull_request: pull_request.clone(),
            assignees: assignees.clone(),
            reviewers: selection.to_vec(),
        }
    } else {
        Action::AssignUsersToPullRequest {
            pull_request: pull_request.clone(),
            assignees: assignees.clone(),
            reviewers: selection.to_vec(),
        }
    });

    for channel in &config.notification_channels {
        let recipients = match channel {
            NotificationChannel::Platform => assignees.clone(),
            NotificationChannel::Chat => assignees
                .iter()
                .map(|login| resolve_chat_identity(config, login, chat_identities))
                .collect(),
        };

        actions.push(Action::Notify {
            pull_request: pull_request.clone(),
            channel: *channel,
            recipients,
        });
    }

    Plan { actions }
}

/// Chat identity resolution order: injected mapping, then the reviewer
/// roster's notification target, then the raw login.
fn resolve_chat_identity(
    config: &ReviewConfig,
    login: &str,
    chat_identities: Option<&ChatIdentityResolver<'_>>,
) -> String {
    if let Some(resolve) = chat_identities {
        if let Some(handle) = resolve(login) {
            return handle;
        }
    }

    config
        .reviewers
        .get(login)
        .and_then(|target| target.chat_handle())
        .map(str::to_string)
        .unwrap_or_else(|| login.to_string())
}
