//! Configuration validation.
//!
//! Checks that every configured value is usable before it reaches the
//! validators and forms.

use crate::config::schema::{Config, PolicyConfig, RulesConfig, MAX_REDIRECT_DELAY_MS};
use crate::error::{Error, Result};
use crate::validation::{
    DEFAULT_MAX_DURATION_MINUTES, DEFAULT_MIN_DURATION_MINUTES, MAX_POLICY_DURATION_MINUTES,
};

/// Validates configuration values.
///
/// # Examples
///
/// ```
/// use apartado::config::{Config, ConfigValidator};
///
/// let config = Config::default();
/// ConfigValidator::validate(&config).unwrap();
/// ```
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a complete configuration.
    ///
    /// # Errors
    ///
    /// Returns the first invalid value found.
    pub fn validate(config: &Config) -> Result<()> {
        if let Some(ref policy) = config.policy {
            Self::validate_policy(policy)?;
        }

        if let Some(ref rules) = config.rules {
            Self::validate_rules(rules)?;
        }

        if let Some(delay) = config
            .submission
            .as_ref()
            .and_then(|s| s.redirect_delay_ms)
        {
            if delay > MAX_REDIRECT_DELAY_MS {
                return Err(Error::Validation {
                    field: "submission.redirect_delay_ms".into(),
                    message: format!("Delay cannot exceed {MAX_REDIRECT_DELAY_MS} ms"),
                });
            }
        }

        Ok(())
    }

    /// Validate the duration bounds.
    ///
    /// A bound left unset is checked against the default of the other.
    fn validate_policy(policy: &PolicyConfig) -> Result<()> {
        let min = policy
            .min_duration_minutes
            .unwrap_or(DEFAULT_MIN_DURATION_MINUTES);
        let max = policy
            .max_duration_minutes
            .unwrap_or(DEFAULT_MAX_DURATION_MINUTES);

        if min <= 0 {
            return Err(Error::Validation {
                field: "policy.min_duration_minutes".into(),
                message: "Minimum duration must be greater than 0".into(),
            });
        }

        if max > MAX_POLICY_DURATION_MINUTES {
            return Err(Error::Validation {
                field: "policy.max_duration_minutes".into(),
                message: format!(
                    "Maximum duration cannot exceed {MAX_POLICY_DURATION_MINUTES} minutes"
                ),
            });
        }

        if max < min {
            return Err(Error::Validation {
                field: "policy.max_duration_minutes".into(),
                message: format!("Maximum duration ({max}) must be >= minimum duration ({min})"),
            });
        }

        Ok(())
    }

    fn validate_rules(rules: &RulesConfig) -> Result<()> {
        for (field, value) in [
            ("rules.title_min_length", rules.title_min_length),
            ("rules.password_min_length", rules.password_min_length),
            ("rules.space_name_min_length", rules.space_name_min_length),
        ] {
            if value == Some(0) {
                return Err(Error::Validation {
                    field: field.into(),
                    message: "Length must be greater than 0".into(),
                });
            }
        }
        Ok(())
    }
}
