//! Plan execution.
//!
//! Actions run strictly in plan order and the first failure aborts the
//! run. There is no rollback: a retry run clears stale state itself via
//! its leading unassign/delete action, so a partially executed plan is
//! safe to re-plan and re-run.

use review_roster_developer_platforms::{ChatNotifier, PullRequestProvider};
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::config::NotificationChannel;
use crate::errors::EngineError;
use crate::plan::{Action, Plan};

#[cfg(test)]
#[path = "execute_tests.rs"]
mod tests;

/// Executes every action in the plan, in order.
///
/// Chat notifications are skipped with a warning when no notifier is
/// wired up; every other action is mandatory.
///
/// # Errors
///
/// The first [`EngineError::Platform`] raised by the provider or the
/// notifier. Earlier actions stay applied.
#[instrument(skip_all, fields(actions = plan.actions.len()))]
pub async fn execute_plan<P: PullRequestProvider>(
    provider: &P,
    notifier: Option<&dyn ChatNotifier>,
    plan: &Plan,
) -> Result<(), EngineError> {
    for action in &plan.actions {
        match action {
            Action::AssignUsersToPullRequest {
                pull_request,
                assignees,
                ..
            } => {
                info!(
                    pull_request = pull_request.number,
                    assignees = ?assignees,
                    "Assigning reviewers"
                );
                provider
                    .assign_users(
                        &pull_request.owner,
                        &pull_request.repo,
                        pull_request.number,
                        assignees,
                    )
                    .await?;
            }
            Action::UnassignUsersFromPullRequest {
                pull_request,
                assignees,
            } => {
                info!(
                    pull_request = pull_request.number,
                    assignees = ?assignees,
                    "Unassigning stale reviewers"
                );
                provider
                    .unassign_users(
                        &pull_request.owner,
                        &pull_request.repo,
                        pull_request.number,
                        assignees,
                    )
                    .await?;
            }
            Action::CreateReviewRequest {
                pull_request,
                assignees,
                ..
            } => {
                info!(
                    pull_request = pull_request.number,
                    reviewers = ?assignees,
                    "Requesting reviews"
                );
                provider
                    .create_review_requests(
                        &pull_request.owner,
                        &pull_request.repo,
                        pull_request.number,
                        assignees,
                    )
                    .await?;
            }
            Action::DeleteReviewRequests {
                pull_request,
                assignees,
            } => {
                info!(
                    pull_request = pull_request.number,
                    reviewers = ?assignees,
                    "Withdrawing stale review requests"
                );
                provider
                    .delete_review_requests(
                        &pull_request.owner,
                        &pull_request.repo,
                        pull_request.number,
                        assignees,
                    )
                    .await?;
            }
            Action::Notify {
                pull_request,
                channel: NotificationChannel::Platform,
                recipients,
            } => {
                let mentions: Vec<String> =
                    recipients.iter().map(|login| format!("@{login}")).collect();
                let comment = format!(
                    "{}: please review this pull request",
                    mentions.join(", ")
                );
                provider
                    .add_comment(
                        &pull_request.owner,
                        &pull_request.repo,
                        pull_request.number,
                        &comment,
                    )
                    .await?;
            }
            Action::Notify {
                pull_request,
                channel: NotificationChannel::Chat,
                recipients,
            } => {
                let Some(notifier) = notifier else {
                    warn!(
                        pull_request = pull_request.number,
                        "No chat notifier configured; skipping chat notification"
                    );
                    continue;
                };
                notifier
                    .notify_chat(
                        "review",
                        json!({
                            "owner": pull_request.owner,
                            "repo": pull_request.repo,
                            "number": pull_request.number,
                            "recipients": recipients,
                        }),
                    )
                    .await?;
            }
        }
    }

    Ok(())
}
