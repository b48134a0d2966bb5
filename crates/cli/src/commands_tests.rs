use super::*;

fn target(repo: &str) -> ReviewTarget {
    ReviewTarget {
        repo: repo.to_string(),
        pr_number: 7,
        token: "ghp_dummy".to_string(),
        config: None,
        retry: false,
        public_mode: false,
        no_random_assignment: false,
        seed: None,
    }
}

#[test]
fn test_locator_parses_owner_and_name() {
    let locator = target("octo/engine").locator().unwrap();
    assert_eq!(locator.owner, "octo");
    assert_eq!(locator.repo, "engine");
    assert_eq!(locator.number, 7);
}

#[test]
fn test_locator_rejects_malformed_repo() {
    for repo in ["engine", "octo/", "/engine", ""] {
        let result = target(repo).locator();
        assert!(
            matches!(result, Err(CliError::InvalidArguments(_))),
            "repo '{}' should be rejected",
            repo
        );
    }
}

#[test]
fn test_options_carry_flags() {
    let mut target = target("octo/engine");
    target.retry = true;
    target.public_mode = true;
    target.no_random_assignment = true;

    let options = target.options();
    assert!(options.retry_review);
    assert!(options.overrides.public_mode);
    assert!(options.overrides.disable_random_assignment);
    assert!(options.chat_identities.is_none());
}

#[tokio::test]
async fn test_build_roster_rejects_unreadable_config() {
    let mut target = target("octo/engine");
    target.config = Some("/nonexistent/policy.yml".to_string());

    let result = build_roster(&target);
    assert!(matches!(result, Err(CliError::ConfigError(_))));
}

#[tokio::test]
async fn test_build_roster_rejects_invalid_config() {
    let file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(file.path(), "version: 99\n").unwrap();

    let mut target = target("octo/engine");
    target.config = Some(file.path().to_string_lossy().into_owned());

    let result = build_roster(&target);
    assert!(matches!(result, Err(CliError::ConfigError(_))));
}

#[tokio::test]
async fn test_build_roster_accepts_valid_config() {
    let file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(file.path(), "version: 2\nmax_reviewers: 3\n").unwrap();

    let mut target = target("octo/engine");
    target.config = Some(file.path().to_string_lossy().into_owned());

    assert!(build_roster(&target).is_ok());
}
