use super::*;

use crate::config::ConfigDocument;
use crate::errors::EngineError;

fn config(document: ConfigDocument) -> ReviewConfig {
    ReviewConfig::resolve(ConfigDocument {
        version: Some(2),
        ..document
    })
    .unwrap()
}

#[test]
fn test_static_quota_with_no_existing_assignees() {
    let config = config(ConfigDocument {
        min_reviewers: Some(1),
        max_reviewers: Some(3),
        ..ConfigDocument::default()
    });

    let quota = compute(&config, 0, 10, 100).unwrap();
    assert_eq!(quota.max_assignable, 3);
    assert_eq!(quota.min_assignable, 1);
    assert!(!quota.dynamic);
}

#[test]
fn test_static_quota_subtracts_existing_assignees() {
    let config = config(ConfigDocument {
        min_reviewers: Some(2),
        max_reviewers: Some(3),
        ..ConfigDocument::default()
    });

    let quota = compute(&config, 1, 10, 100).unwrap();
    assert_eq!(quota.max_assignable, 2);
    assert_eq!(quota.min_assignable, 2);
}

#[test]
fn test_maximum_already_assigned() {
    let config = config(ConfigDocument {
        min_reviewers: Some(1),
        max_reviewers: Some(2),
        ..ConfigDocument::default()
    });

    let result = compute(&config, 2, 10, 100);
    assert!(matches!(result, Err(EngineError::MaximumReviewersAssigned)));
}

#[test]
fn test_minimum_already_assigned() {
    let config = config(ConfigDocument {
        min_reviewers: Some(1),
        max_reviewers: Some(3),
        ..ConfigDocument::default()
    });

    let result = compute(&config, 1, 10, 100);
    assert!(matches!(result, Err(EngineError::MinimumReviewersAssigned)));
}

#[test]
fn test_dynamic_quota_by_files_rounds_up() {
    let config = config(ConfigDocument {
        min_reviewers: Some(1),
        max_reviewers: Some(10),
        max_files_per_reviewer: Some(4),
        ..ConfigDocument::default()
    });

    // 9 files at 4 per reviewer needs 3 reviewers.
    let quota = compute(&config, 0, 9, 0).unwrap();
    assert!(quota.dynamic);
    assert_eq!(quota.max_assignable, 3);
    assert_eq!(quota.min_assignable, 3);
}

#[test]
fn test_dynamic_quota_by_lines_rounds_up() {
    let config = config(ConfigDocument {
        min_reviewers: Some(1),
        max_reviewers: Some(10),
        max_lines_per_reviewer: Some(100),
        ..ConfigDocument::default()
    });

    let quota = compute(&config, 0, 0, 250).unwrap();
    assert_eq!(quota.max_assignable, 3);
}

#[test]
fn test_dynamic_quota_takes_smaller_of_both_metrics() {
    let config = config(ConfigDocument {
        min_reviewers: Some(1),
        max_reviewers: Some(10),
        max_files_per_reviewer: Some(2),
        max_lines_per_reviewer: Some(100),
        ..ConfigDocument::default()
    });

    // Files alone wants 5, lines alone wants 2; the cheaper one wins.
    let quota = compute(&config, 0, 10, 150).unwrap();
    assert_eq!(quota.max_assignable, 2);
}

#[test]
fn test_dynamic_quota_floors_at_min_reviewers() {
    let config = config(ConfigDocument {
        min_reviewers: Some(2),
        max_reviewers: Some(10),
        max_files_per_reviewer: Some(100),
        ..ConfigDocument::default()
    });

    let quota = compute(&config, 0, 1, 0).unwrap();
    assert_eq!(quota.max_assignable, 2);
}

#[test]
fn test_dynamic_quota_caps_at_open_slots() {
    let config = config(ConfigDocument {
        min_reviewers: Some(2),
        max_reviewers: Some(3),
        max_files_per_reviewer: Some(1),
        ..ConfigDocument::default()
    });

    let quota = compute(&config, 1, 50, 0).unwrap();
    assert_eq!(quota.max_assignable, 2);
}
