//! Environment variable handling for configuration overrides.
//!
//! This module provides support for `APARTADO_*` environment variables that
//! override configuration file values.

use crate::config::schema::{Config, OutputFormat};
use crate::error::{Error, Result};
use std::env;
use std::str::FromStr;

/// Overrides the minimum reservation duration.
pub const MIN_DURATION_ENV: &str = "APARTADO_MIN_DURATION_MINUTES";
/// Overrides the maximum reservation duration.
pub const MAX_DURATION_ENV: &str = "APARTADO_MAX_DURATION_MINUTES";
/// Overrides the minimum title length.
pub const TITLE_MIN_LENGTH_ENV: &str = "APARTADO_TITLE_MIN_LENGTH";
/// Overrides the minimum password length.
pub const PASSWORD_MIN_LENGTH_ENV: &str = "APARTADO_PASSWORD_MIN_LENGTH";
/// Overrides the post-submit redirect delay.
pub const REDIRECT_DELAY_ENV: &str = "APARTADO_REDIRECT_DELAY_MS";
/// Overrides the output format.
pub const OUTPUT_FORMAT_ENV: &str = "APARTADO_OUTPUT_FORMAT";

/// Handles environment variable overrides for configuration.
///
/// # Examples
///
/// ```no_run
/// use apartado::config::{Config, EnvironmentConfig};
///
/// let mut config = Config::default();
/// EnvironmentConfig::apply_overrides(&mut config).unwrap();
/// ```
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Apply environment variable overrides to config.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable holds a value of the wrong shape.
    pub fn apply_overrides(config: &mut Config) -> Result<()> {
        if let Some(min) = Self::read::<i64>(MIN_DURATION_ENV, "Must be an integer")? {
            config
                .policy
                .get_or_insert_with(Default::default)
                .min_duration_minutes = Some(min);
        }

        if let Some(max) = Self::read::<i64>(MAX_DURATION_ENV, "Must be an integer")? {
            config
                .policy
                .get_or_insert_with(Default::default)
                .max_duration_minutes = Some(max);
        }

        if let Some(len) = Self::read::<usize>(TITLE_MIN_LENGTH_ENV, "Must be a positive integer")? {
            config
                .rules
                .get_or_insert_with(Default::default)
                .title_min_length = Some(len);
        }

        if let Some(len) =
            Self::read::<usize>(PASSWORD_MIN_LENGTH_ENV, "Must be a positive integer")?
        {
            config
                .rules
                .get_or_insert_with(Default::default)
                .password_min_length = Some(len);
        }

        if let Some(ms) = Self::read::<u64>(REDIRECT_DELAY_ENV, "Must be a number of milliseconds")? {
            config
                .submission
                .get_or_insert_with(Default::default)
                .redirect_delay_ms = Some(ms);
        }

        if let Ok(format) = env::var(OUTPUT_FORMAT_ENV) {
            config.output_format =
                Some(
                    OutputFormat::from_str(&format).map_err(|message| Error::Validation {
                        field: OUTPUT_FORMAT_ENV.into(),
                        message,
                    })?,
                );
        }

        Ok(())
    }

    /// Reads and parses `name`, if set.
    fn read<T: FromStr>(name: &str, expected: &str) -> Result<Option<T>> {
        match env::var(name) {
            Ok(value) => Self::parse(name, &value, expected).map(Some),
            Err(_) => Ok(None),
        }
    }

    fn parse<T: FromStr>(name: &str, value: &str, expected: &str) -> Result<T> {
        value.trim().parse().map_err(|_| Error::Validation {
            field: name.into(),
            message: format!("{expected}, got '{value}'"),
        })
    }
}
