#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Error types for developer platform operations.
///
/// Each variant provides specific context about the type of failure
/// encountered when talking to a platform like GitHub.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Generic API request failure.
    ///
    /// Used as a fallback when more specific error information is not
    /// available from the platform client.
    #[error("API request failed: {0}")]
    ApiError(String),

    /// Authentication failed with the platform.
    ///
    /// The provided credentials are invalid, expired, or insufficient for
    /// the requested operation.
    #[error("Authentication failed: {0}")]
    AuthError(String),

    /// A record received from the platform failed validation.
    ///
    /// Signals upstream data corruption (malformed file or blame records);
    /// these are never retried internally.
    #[error("Invalid platform data: {0}")]
    InvalidData(String),

    /// Invalid response format from the platform API.
    ///
    /// The response was not in the expected shape, e.g. a GraphQL payload
    /// with missing fields.
    #[error("Invalid response format")]
    InvalidResponse,

    /// The requested resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Failed to update the pull request.
    ///
    /// An assignment, review-request, or comment mutation was rejected.
    #[error("Failed to update the PR: {0}")]
    FailedToUpdatePullRequest(String),
}
