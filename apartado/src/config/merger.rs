//! Configuration merging and precedence handling.
//!
//! Nested sections are merged field by field so that a project file can
//! override one bound while inheriting the other from the user file.

use crate::config::loader::ConfigSource;
use crate::config::schema::{Config, PolicyConfig, RulesConfig, SubmissionConfig};

/// Merges configuration sources according to precedence rules.
///
/// # Examples
///
/// ```
/// use apartado::config::{Config, ConfigMerger, OutputFormat};
///
/// let low = Config { output_format: Some(OutputFormat::Human), ..Default::default() };
/// let high = Config { output_format: Some(OutputFormat::Json), ..Default::default() };
///
/// let mut result = low;
/// ConfigMerger::merge_into(&mut result, &high);
/// assert_eq!(result.output_format, Some(OutputFormat::Json));
/// ```
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge multiple configuration sources into final config.
    ///
    /// Sources should be provided in order from lowest to highest precedence.
    #[must_use]
    pub fn merge(sources: Vec<ConfigSource>) -> Config {
        let mut result = Config::default();
        for source in sources {
            Self::merge_into(&mut result, &source.config);
        }
        result
    }

    /// Merge source config into target (source overwrites target).
    pub fn merge_into(target: &mut Config, source: &Config) {
        if source.output_format.is_some() {
            target.output_format = source.output_format;
        }

        if let Some(ref policy) = source.policy {
            target.policy = Some(match &target.policy {
                Some(existing) => Self::merge_policy(existing, policy),
                None => policy.clone(),
            });
        }

        if let Some(ref rules) = source.rules {
            target.rules = Some(match &target.rules {
                Some(existing) => Self::merge_rules(existing, rules),
                None => rules.clone(),
            });
        }

        if let Some(ref submission) = source.submission {
            target.submission = Some(SubmissionConfig {
                redirect_delay_ms: submission.redirect_delay_ms.or(target
                    .submission
                    .as_ref()
                    .and_then(|s| s.redirect_delay_ms)),
            });
        }
    }

    fn merge_policy(target: &PolicyConfig, source: &PolicyConfig) -> PolicyConfig {
        PolicyConfig {
            min_duration_minutes: source.min_duration_minutes.or(target.min_duration_minutes),
            max_duration_minutes: source.max_duration_minutes.or(target.max_duration_minutes),
        }
    }

    fn merge_rules(target: &RulesConfig, source: &RulesConfig) -> RulesConfig {
        RulesConfig {
            title_min_length: source.title_min_length.or(target.title_min_length),
            password_min_length: source.password_min_length.or(target.password_min_length),
            space_name_min_length: source
                .space_name_min_length
                .or(target.space_name_min_length),
        }
    }
}
