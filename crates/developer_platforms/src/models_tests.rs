use super::*;

#[test]
fn test_blame_range_new_valid() {
    let range = BlameRange::new("alice", 5, 2).unwrap();
    assert_eq!(range.login, "alice");
    assert_eq!(range.count, 5);
    assert_eq!(range.age, 2);
}

#[test]
fn test_blame_range_rejects_empty_login() {
    let result = BlameRange::new("", 5, 2);
    assert!(matches!(result, Err(Error::InvalidData(_))));
}

#[test]
fn test_blame_range_rejects_zero_count() {
    let result = BlameRange::new("alice", 0, 2);
    assert!(matches!(result, Err(Error::InvalidData(_))));
}

#[test]
fn test_pull_request_is_open() {
    let pr = PullRequest {
        number: 1,
        title: "title".to_string(),
        body: None,
        state: "open".to_string(),
        author: None,
        assignees: Vec::new(),
        head_sha: "sha".to_string(),
    };
    assert!(pr.is_open());

    let closed = PullRequest {
        state: "closed".to_string(),
        ..pr
    };
    assert!(!closed.is_open());
}

#[test]
fn test_file_status_deserializes_known_and_unknown() {
    let modified: FileStatus = serde_json::from_str("\"modified\"").unwrap();
    assert_eq!(modified, FileStatus::Modified);

    let added: FileStatus = serde_json::from_str("\"added\"").unwrap();
    assert_eq!(added, FileStatus::Added);

    let removed: FileStatus = serde_json::from_str("\"removed\"").unwrap();
    assert_eq!(removed, FileStatus::Removed);

    let renamed: FileStatus = serde_json::from_str("\"renamed\"").unwrap();
    assert_eq!(renamed, FileStatus::Other);
}

#[test]
fn test_pull_request_file_rejects_missing_fields() {
    let incomplete = r#"{"filename": "src/lib.rs", "status": "modified"}"#;
    let result: Result<PullRequestFile, _> = serde_json::from_str(incomplete);
    assert!(result.is_err());
}

#[test]
fn test_pull_request_file_deserializes() {
    let payload = r#"{
        "filename": "src/lib.rs",
        "status": "modified",
        "changes": 12,
        "additions": 8,
        "deletions": 4
    }"#;
    let file: PullRequestFile = serde_json::from_str(payload).unwrap();
    assert_eq!(file.filename, "src/lib.rs");
    assert_eq!(file.status, FileStatus::Modified);
    assert_eq!(file.changes, 12);
}
