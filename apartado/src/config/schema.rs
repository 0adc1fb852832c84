//! Configuration schema definitions.
//!
//! This module defines the configuration structure for apartado: duration
//! policy bounds, field rule lengths, submission timing and output format.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::form::reservation::DEFAULT_REDIRECT_DELAY;
use crate::validation::field::{
    DEFAULT_PASSWORD_MIN_LENGTH, DEFAULT_SPACE_NAME_MIN_LENGTH, DEFAULT_TITLE_MIN_LENGTH,
};
use crate::validation::{
    DurationPolicy, FieldRules, DEFAULT_MAX_DURATION_MINUTES, DEFAULT_MIN_DURATION_MINUTES,
};

/// Upper bound on the post-submit redirect delay.
pub const MAX_REDIRECT_DELAY_MS: u64 = 60_000;

/// Complete configuration structure.
///
/// Every section is optional; missing values fall back to the built-in
/// defaults when the effective policy or rules are requested.
///
/// # Examples
///
/// ```
/// use apartado::config::{Config, PolicyConfig};
///
/// let config = Config {
///     policy: Some(PolicyConfig {
///         min_duration_minutes: Some(15),
///         max_duration_minutes: None,
///     }),
///     ..Default::default()
/// };
/// let policy = config.duration_policy().unwrap();
/// assert_eq!(policy.min_minutes(), 15);
/// assert_eq!(policy.max_minutes(), 240);
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Reservation duration bounds.
    pub policy: Option<PolicyConfig>,

    /// Minimum field lengths.
    pub rules: Option<RulesConfig>,

    /// Submission timing.
    pub submission: Option<SubmissionConfig>,

    /// Output format for CLI reports.
    pub output_format: Option<OutputFormat>,
}

impl Config {
    /// The duration policy these settings describe.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the bounds are inconsistent.
    pub fn duration_policy(&self) -> Result<DurationPolicy> {
        let policy = self.policy.clone().unwrap_or_default();
        DurationPolicy::new(
            policy
                .min_duration_minutes
                .unwrap_or(DEFAULT_MIN_DURATION_MINUTES),
            policy
                .max_duration_minutes
                .unwrap_or(DEFAULT_MAX_DURATION_MINUTES),
        )
    }

    /// The field rules these settings describe.
    #[must_use]
    pub fn field_rules(&self) -> FieldRules {
        let rules = self.rules.clone().unwrap_or_default();
        FieldRules {
            title_min_length: rules.title_min_length.unwrap_or(DEFAULT_TITLE_MIN_LENGTH),
            password_min_length: rules
                .password_min_length
                .unwrap_or(DEFAULT_PASSWORD_MIN_LENGTH),
            space_name_min_length: rules
                .space_name_min_length
                .unwrap_or(DEFAULT_SPACE_NAME_MIN_LENGTH),
        }
    }

    /// Delay between a successful reservation and the redirect.
    #[must_use]
    pub fn redirect_delay(&self) -> Duration {
        self.submission
            .as_ref()
            .and_then(|s| s.redirect_delay_ms)
            .map_or(DEFAULT_REDIRECT_DELAY, Duration::from_millis)
    }

    /// Report format, human-readable unless configured otherwise.
    #[must_use]
    pub fn output_format(&self) -> OutputFormat {
        self.output_format.unwrap_or_default()
    }
}

/// Reservation duration bounds, in minutes.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PolicyConfig {
    /// Shortest allowed reservation.
    pub min_duration_minutes: Option<i64>,

    /// Longest allowed reservation.
    pub max_duration_minutes: Option<i64>,
}

/// Minimum lengths of the length-checked fields.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RulesConfig {
    /// Reservation title.
    pub title_min_length: Option<usize>,

    /// Password on the user forms.
    pub password_min_length: Option<usize>,

    /// Space name.
    pub space_name_min_length: Option<usize>,
}

/// Submission settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SubmissionConfig {
    /// Milliseconds the success message stays up before redirecting.
    pub redirect_delay_ms: Option<u64>,
}

/// Output format for CLI reports.
///
/// # Examples
///
/// ```
/// use apartado::config::OutputFormat;
///
/// let format = OutputFormat::Json;
/// assert_eq!(format.to_string(), "json");
/// ```
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Human,
    /// JSON output format.
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Human => write!(f, "human"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown output format '{other}' (expected human or json)")),
        }
    }
}
