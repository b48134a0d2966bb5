//! Policy configuration for reviewer assignment.
//!
//! A policy document arrives either as an already-structured
//! [`ConfigDocument`] or as its YAML/JSON text form. Resolution dispatches
//! on the schema version tag, applies that version's defaults, validates
//! every field, and produces an immutable [`ReviewConfig`]. Validation is
//! all-or-nothing: no partially resolved configuration is ever observable.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::paths::PathRule;
use crate::scoring::ScoringMode;

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Schema versions the resolver understands.
pub const SUPPORTED_CONFIG_VERSIONS: [u64; 2] = [1, 2];

/// Cap applied to `max_reviewers` when resolving in public mode.
pub const PUBLIC_MAX_REVIEWERS: u64 = 2;

/// Cap applied to `max_files` when resolving in public mode.
pub const PUBLIC_MAX_FILES: u64 = 5;

/// Where a reviewer can be notified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationChannel {
    /// A comment on the pull request itself
    Platform,
    /// A chat message (Slack or similar)
    Chat,
}

/// Notification target(s) for a single reviewer login.
///
/// The document form accepts either a bare handle string or a mapping
/// with an explicit `chat` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NotificationTarget {
    /// A single chat handle, e.g. `"@alice"`
    Handle(String),
    /// Structured contact details
    Contact {
        /// The chat identity to notify, when one exists
        #[serde(skip_serializing_if = "Option::is_none")]
        chat: Option<String>,
    },
}

impl NotificationTarget {
    /// The chat handle for this target, when one is configured.
    pub fn chat_handle(&self) -> Option<&str> {
        match self {
            NotificationTarget::Handle(handle) => Some(handle),
            NotificationTarget::Contact { chat } => chat.as_deref(),
        }
    }
}

/// The raw, unvalidated policy document.
///
/// Numeric fields are deliberately signed so that out-of-range input is
/// caught by the resolver (with a field-specific error) instead of by the
/// deserializer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigDocument {
    /// Schema version tag; selects the defaulting/validation arm
    pub version: Option<u64>,
    #[serde(default)]
    pub min_reviewers: Option<i64>,
    #[serde(default)]
    pub max_reviewers: Option<i64>,
    #[serde(default)]
    pub max_files: Option<i64>,
    #[serde(default)]
    pub max_files_per_reviewer: Option<i64>,
    #[serde(default)]
    pub max_lines_per_reviewer: Option<i64>,
    #[serde(default)]
    pub min_authors_of_changed_files: Option<i64>,
    #[serde(default)]
    pub min_lines_changed_for_extra_reviewer: Option<i64>,
    #[serde(default)]
    pub min_percent_authorship_for_extra_reviewer: Option<i64>,
    #[serde(default)]
    pub assign_min_reviewers_randomly: Option<bool>,
    #[serde(default)]
    pub require_notification: Option<bool>,
    #[serde(default)]
    pub use_review_requests: Option<bool>,
    #[serde(default)]
    pub reviewers: Option<BTreeMap<String, NotificationTarget>>,
    #[serde(default)]
    pub review_blacklist: Option<Vec<String>>,
    #[serde(default)]
    pub file_blacklist: Option<Vec<String>>,
    #[serde(default)]
    pub label_whitelist: Option<Vec<String>>,
    #[serde(default)]
    pub label_blacklist: Option<Vec<String>>,
    #[serde(default)]
    pub review_path_assignments: Option<BTreeMap<String, Vec<String>>>,
    #[serde(default)]
    pub review_path_fallbacks: Option<BTreeMap<String, Vec<String>>>,
    #[serde(default)]
    pub notification_channels: Option<Vec<NotificationChannel>>,
}

/// Environment-level overrides applied as a final transform over the
/// resolved configuration. Modeled as an explicit input so resolution
/// stays a pure function of `(document, overrides)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverridePolicy {
    /// Clamp numeric extremes and disable fallback/diversity behavior,
    /// for multi-tenant ("public") deployments
    pub public_mode: bool,
    /// Force randomized minimum-reviewer assignment off
    pub disable_random_assignment: bool,
}

/// The resolved, immutable review policy.
///
/// Constructed only through [`ReviewConfig::parse`] or
/// [`ReviewConfig::resolve`]; all invariants (`min <= max`, non-negative
/// counts, percent within 0–100, well-formed globs) hold by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewConfig {
    /// The schema version the document was resolved under
    pub version: u64,
    pub min_reviewers: u64,
    pub max_reviewers: u64,
    /// Cap on files considered for blame; 0 means unbounded
    pub max_files: u64,
    /// Dynamic-quota knob; 0 disables the files metric
    pub max_files_per_reviewer: u64,
    /// Dynamic-quota knob; 0 disables the lines metric
    pub max_lines_per_reviewer: u64,
    /// Diversity trigger threshold; 0 disables the trigger
    pub min_authors_of_changed_files: u64,
    /// Heuristic gate; 0 means the heuristic is never size-gated
    pub min_lines_changed_for_extra_reviewer: u64,
    /// Concentration trigger threshold in percent; 0 disables the trigger
    pub min_percent_authorship_for_extra_reviewer: u64,
    pub assign_min_reviewers_randomly: bool,
    /// When set, logins without a notification target are ineligible
    pub require_notification: bool,
    /// Selects the review-request action family over plain assignment
    pub use_review_requests: bool,
    pub reviewers: BTreeMap<String, NotificationTarget>,
    pub review_blacklist: BTreeSet<String>,
    pub file_blacklist: Vec<String>,
    pub label_whitelist: Vec<String>,
    pub label_blacklist: Vec<String>,
    pub review_path_assignments: BTreeMap<String, Vec<String>>,
    pub review_path_fallbacks: BTreeMap<String, Vec<String>>,
    pub notification_channels: BTreeSet<NotificationChannel>,
}

impl ReviewConfig {
    /// Parses a policy document from its textual form.
    ///
    /// YAML parsing subsumes JSON, so both serializations are accepted.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`]; see [`ReviewConfig::resolve`].
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let document: ConfigDocument = serde_yaml::from_str(text)
            .map_err(|e| ConfigError::InvalidDocument(e.to_string()))?;
        Self::resolve(document)
    }

    /// Resolves a structured policy document into a validated config.
    ///
    /// Dispatches on the version tag: version 1 recognizes the initial
    /// field subset and ranks by total attributed lines; version 2
    /// recognizes the full field set and ranks by blame-weighted
    /// ownership.
    pub fn resolve(document: ConfigDocument) -> Result<Self, ConfigError> {
        let resolved = match document.version {
            None => return Err(ConfigError::MissingVersion),
            Some(1) => Self::resolve_v1(document)?,
            Some(2) => Self::resolve_v2(document)?,
            Some(other) => return Err(ConfigError::UnsupportedVersion(other)),
        };

        resolved.validate()?;
        Ok(resolved)
    }

    /// Applies environment-level overrides, yielding a new configuration.
    ///
    /// Public mode clamps `max_reviewers` and `max_files`, clears path
    /// fallbacks, and zeroes the diversity/concentration knobs.
    pub fn apply_overrides(mut self, overrides: &OverridePolicy) -> Self {
        if overrides.public_mode {
            self.max_reviewers = self.max_reviewers.min(PUBLIC_MAX_REVIEWERS);
            self.min_reviewers = self.min_reviewers.min(self.max_reviewers);
            self.max_files = if self.max_files == 0 {
                PUBLIC_MAX_FILES
            } else {
                self.max_files.min(PUBLIC_MAX_FILES)
            };
            self.review_path_fallbacks.clear();
            self.min_authors_of_changed_files = 0;
            self.min_percent_authorship_for_extra_reviewer = 0;
        }

        if overrides.disable_random_assignment {
            self.assign_min_reviewers_randomly = false;
        }

        self
    }

    /// The ranking mode this configuration's version selects.
    pub fn scoring_mode(&self) -> ScoringMode {
        if self.version >= 2 {
            ScoringMode::Ownership
        } else {
            ScoringMode::TotalLines
        }
    }

    /// Whether any label gating is configured.
    pub fn gates_on_labels(&self) -> bool {
        !self.label_whitelist.is_empty() || !self.label_blacklist.is_empty()
    }

    fn resolve_v1(document: ConfigDocument) -> Result<Self, ConfigError> {
        Ok(Self {
            version: 1,
            min_reviewers: non_negative(document.min_reviewers, 1, "minimum reviewers")?,
            max_reviewers: non_negative(document.max_reviewers, 2, "maximum reviewers")?,
            max_files: non_negative(document.max_files, 5, "maximum files")?,
            max_files_per_reviewer: non_negative(
                document.max_files_per_reviewer,
                0,
                "maximum files per reviewer",
            )?,
            max_lines_per_reviewer: 0,
            min_authors_of_changed_files: 0,
            min_lines_changed_for_extra_reviewer: 0,
            min_percent_authorship_for_extra_reviewer: 0,
            assign_min_reviewers_randomly: document.assign_min_reviewers_randomly.unwrap_or(true),
            require_notification: document.require_notification.unwrap_or(true),
            use_review_requests: false,
            reviewers: document.reviewers.unwrap_or_default(),
            review_blacklist: document
                .review_blacklist
                .unwrap_or_default()
                .into_iter()
                .collect(),
            file_blacklist: Vec::new(),
            label_whitelist: Vec::new(),
            label_blacklist: Vec::new(),
            review_path_assignments: BTreeMap::new(),
            review_path_fallbacks: document.review_path_fallbacks.unwrap_or_default(),
            notification_channels: BTreeSet::from([NotificationChannel::Platform]),
        })
    }

    fn resolve_v2(document: ConfigDocument) -> Result<Self, ConfigError> {
        let channels = match document.notification_channels {
            Some(channels) if !channels.is_empty() => channels.into_iter().collect(),
            _ => BTreeSet::from([NotificationChannel::Platform]),
        };

        Ok(Self {
            version: 2,
            min_reviewers: non_negative(document.min_reviewers, 1, "minimum reviewers")?,
            max_reviewers: non_negative(document.max_reviewers, 2, "maximum reviewers")?,
            max_files: non_negative(document.max_files, 5, "maximum files")?,
            max_files_per_reviewer: non_negative(
                document.max_files_per_reviewer,
                0,
                "maximum files per reviewer",
            )?,
            max_lines_per_reviewer: non_negative(
                document.max_lines_per_reviewer,
                0,
                "maximum lines per reviewer",
            )?,
            min_authors_of_changed_files: non_negative(
                document.min_authors_of_changed_files,
                0,
                "minimum authors of changed files",
            )?,
            min_lines_changed_for_extra_reviewer: non_negative(
                document.min_lines_changed_for_extra_reviewer,
                0,
                "minimum lines changed for an extra reviewer",
            )?,
            min_percent_authorship_for_extra_reviewer: non_negative(
                document.min_percent_authorship_for_extra_reviewer,
                0,
                "minimum percent authorship for an extra reviewer",
            )?,
            assign_min_reviewers_randomly: document.assign_min_reviewers_randomly.unwrap_or(true),
            require_notification: document.require_notification.unwrap_or(true),
            use_review_requests: document.use_review_requests.unwrap_or(false),
            reviewers: document.reviewers.unwrap_or_default(),
            review_blacklist: document
                .review_blacklist
                .unwrap_or_default()
                .into_iter()
                .collect(),
            file_blacklist: document.file_blacklist.unwrap_or_default(),
            label_whitelist: document.label_whitelist.unwrap_or_default(),
            label_blacklist: document.label_blacklist.unwrap_or_default(),
            review_path_assignments: document.review_path_assignments.unwrap_or_default(),
            review_path_fallbacks: document.review_path_fallbacks.unwrap_or_default(),
            notification_channels: channels,
        })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.min_reviewers > self.max_reviewers {
            return Err(ConfigError::MinExceedsMax);
        }
        if self.min_percent_authorship_for_extra_reviewer > 100 {
            return Err(ConfigError::InvalidNumericRange(
                "minimum percent authorship for an extra reviewer",
            ));
        }

        for pattern in self
            .file_blacklist
            .iter()
            .chain(self.review_path_assignments.keys())
            .chain(self.review_path_fallbacks.keys())
        {
            PathRule::new(pattern)?;
        }

        Ok(())
    }
}

fn non_negative(
    value: Option<i64>,
    default: u64,
    field: &'static str,
) -> Result<u64, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) if v < 0 => Err(ConfigError::InvalidNumericRange(field)),
        Some(v) => Ok(v as u64),
    }
}
