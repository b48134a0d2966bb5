use thiserror::Error;

use review_roster_developer_platforms::errors::Error as PlatformError;

/// Errors raised while resolving a policy document.
///
/// Configuration failures are all-or-nothing: any of these aborts
/// resolution before a partially built configuration can be observed.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid config: {0}")]
    InvalidDocument(String),

    #[error("Missing config version. Supported versions include: 1, 2")]
    MissingVersion,

    #[error("Unsupported config version: {0}. Supported versions include: 1, 2")]
    UnsupportedVersion(u64),

    #[error("Invalid number of {0}")]
    InvalidNumericRange(&'static str),

    #[error("Minimum reviewers exceeds maximum reviewers")]
    MinExceedsMax,

    #[error("Invalid glob pattern '{pattern}': {message}")]
    InvalidGlob { pattern: String, message: String },
}

/// Errors raised while planning a review.
///
/// All of these are fatal for the current request: no partial plan is
/// ever returned. Quota violations may be retried by the caller with the
/// retry-review flag, which clears existing assignees first.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Pull request has maximum reviewers assigned")]
    MaximumReviewersAssigned,

    #[error("Pull request has minimum reviewers assigned")]
    MinimumReviewersAssigned,

    #[error("No reviewers found")]
    NoReviewersFound,

    #[error("Pull request is not open")]
    PullRequestNotOpen,

    #[error("No pull request author provided")]
    MissingAuthor,

    #[error("Missing configuration")]
    MissingConfiguration,

    #[error("Label '{0}' blocks review assignment")]
    LabelBlocked(String),

    #[error("No permitted label present on the pull request")]
    LabelNotPermitted,

    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),
}
