//! Glob-based path matching for file blacklists, forced path assignments
//! and path fallbacks.
//!
//! Matching is case-sensitive. Patterns without a path separator also
//! match against the file's basename, so `*.rs` covers `src/lib.rs` the
//! way it would in an ignore file.

use std::collections::BTreeMap;

use globset::{GlobBuilder, GlobMatcher};
use review_roster_developer_platforms::models::PullRequestFile;

use crate::errors::ConfigError;

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;

/// A compiled glob pattern over repository-relative paths.
#[derive(Debug, Clone)]
pub struct PathRule {
    matcher: GlobMatcher,
    match_basename: bool,
}

impl PathRule {
    /// Compiles a glob pattern.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidGlob`] for malformed patterns.
    pub fn new(pattern: &str) -> Result<Self, ConfigError> {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .map_err(|e| ConfigError::InvalidGlob {
                pattern: pattern.to_string(),
                message: e.kind().to_string(),
            })?;

        Ok(Self {
            matcher: glob.compile_matcher(),
            match_basename: !pattern.contains('/'),
        })
    }

    /// Whether the rule matches the given path.
    pub fn matches(&self, path: &str) -> bool {
        if self.matcher.is_match(path) {
            return true;
        }

        if self.match_basename {
            if let Some(basename) = path.rsplit('/').next() {
                return self.matcher.is_match(basename);
            }
        }

        false
    }

    /// Whether the rule matches any of the given changed files.
    pub fn matches_any(&self, files: &[PullRequestFile]) -> bool {
        files.iter().any(|file| self.matches(&file.filename))
    }
}

/// A glob rule paired with the reviewer logins it routes to.
#[derive(Debug, Clone)]
pub struct KeyedRule {
    /// The compiled path rule
    pub rule: PathRule,
    /// Logins this rule selects when it matches
    pub logins: Vec<String>,
}

/// Compiles a `glob -> logins` map into matchable rules, preserving the
/// map's (deterministic) key order.
pub fn compile_keyed_rules(
    map: &BTreeMap<String, Vec<String>>,
) -> Result<Vec<KeyedRule>, ConfigError> {
    map.iter()
        .map(|(pattern, logins)| {
            Ok(KeyedRule {
                rule: PathRule::new(pattern)?,
                logins: logins.clone(),
            })
        })
        .collect()
}

/// Compiles a list of blacklist patterns.
pub fn compile_rules(patterns: &[String]) -> Result<Vec<PathRule>, ConfigError> {
    patterns.iter().map(|p| PathRule::new(p)).collect()
}

/// Whether any rule in the set matches the path.
pub fn any_rule_matches(rules: &[PathRule], path: &str) -> bool {
    rules.iter().any(|rule| rule.matches(path))
}
