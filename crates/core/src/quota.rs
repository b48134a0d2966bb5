//! Reviewer quota calculation.
//!
//! Static mode derives the open slot count from `max_reviewers` and the
//! existing assignees. Dynamic mode kicks in when either per-reviewer
//! divisor is configured and sizes the reviewer pool to the change
//! itself, floored at `min_reviewers` and capped by the static slots.

use crate::config::ReviewConfig;
use crate::errors::EngineError;

#[cfg(test)]
#[path = "quota_tests.rs"]
mod tests;

/// The number of reviewers this request may and must end up with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quota {
    /// Upper bound on reviewers the selection may contain
    pub max_assignable: u64,
    /// Fill target the selection should reach
    pub min_assignable: u64,
    /// Whether the dynamic (size-derived) mode was active
    pub dynamic: bool,
}

/// Computes the quota for one review request.
///
/// `existing_assigned` counts current reviewers with the change author
/// already removed; callers invoking a retry pass 0 here after clearing
/// the assignees.
///
/// # Errors
///
/// [`EngineError::MaximumReviewersAssigned`] /
/// [`EngineError::MinimumReviewersAssigned`] when the existing assignees
/// already satisfy the configured bounds.
pub fn compute(
    config: &ReviewConfig,
    existing_assigned: u64,
    changed_file_count: u64,
    net_changed_lines: u64,
) -> Result<Quota, EngineError> {
    if existing_assigned >= config.max_reviewers {
        return Err(EngineError::MaximumReviewersAssigned);
    }
    if existing_assigned >= config.min_reviewers {
        return Err(EngineError::MinimumReviewersAssigned);
    }

    let unassigned = config.max_reviewers - existing_assigned;
    let dynamic = config.max_files_per_reviewer > 0 || config.max_lines_per_reviewer > 0;

    if !dynamic {
        return Ok(Quota {
            max_assignable: unassigned,
            min_assignable: config.min_reviewers,
            dynamic,
        });
    }

    let by_files = (config.max_files_per_reviewer > 0)
        .then(|| changed_file_count.div_ceil(config.max_files_per_reviewer));
    let by_lines = (config.max_lines_per_reviewer > 0)
        .then(|| net_changed_lines.div_ceil(config.max_lines_per_reviewer));

    let needed = match (by_files, by_lines) {
        (Some(files), Some(lines)) => files.min(lines),
        (Some(files), None) => files,
        (None, Some(lines)) => lines,
        (None, None) => unreachable!("dynamic mode requires a configured divisor"),
    };

    let max_assignable = needed.max(config.min_reviewers).min(unassigned);

    Ok(Quota {
        max_assignable,
        // In dynamic mode the computed maximum is also the fill target.
        min_assignable: max_assignable,
        dynamic,
    })
}
