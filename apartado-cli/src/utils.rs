//! Utility functions for CLI operations.
//!
//! This module provides common utility functions used across CLI commands,
//! including configuration loading, timestamp arguments and report output.

use crate::error::CliError;
use apartado::validation::parse_timestamp;
use apartado::{Config, ConfigBuilder, FieldErrors, OutputFormat, SubmitError};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::env;
use std::path::PathBuf;

/// Global CLI options shared across all commands.
#[derive(Debug, Clone)]
#[allow(dead_code)] // verbose is consumed by the logger in main.rs
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Explicit configuration file.
    pub config: Option<PathBuf>,
}

/// Load hierarchical configuration.
///
/// Configuration is merged from multiple sources with precedence:
/// 1. Environment variables (highest priority)
/// 2. `--config` file, or the discovered `apartado.yaml`
/// 3. User configuration in `~/.apartado/config.yaml`
/// 4. Built-in defaults (lowest priority)
pub fn load_configuration(global: &GlobalOptions) -> Result<Config, CliError> {
    let working_dir = env::current_dir()?;
    let mut builder = ConfigBuilder::new().with_working_dir(&working_dir);

    if let Some(ref path) = global.config {
        if !path.exists() {
            return Err(CliError::InvalidArguments(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        builder = builder.with_file(path);
    }

    builder.build().map_err(|e| CliError::Config(e.to_string()))
}

/// Parse a timestamp argument.
pub fn parse_timestamp_arg(name: &str, value: &str) -> Result<NaiveDateTime, CliError> {
    parse_timestamp(value).ok_or_else(|| {
        CliError::InvalidArguments(format!("--{name}: '{value}' is not a date and time"))
    })
}

/// Resolve the output format: the flag wins over configuration.
pub fn resolve_format(flag: Option<OutputFormat>, config: &Config) -> OutputFormat {
    flag.unwrap_or_else(|| config.output_format())
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::InvalidArguments(format!("Cannot render JSON: {e}")))?;
    println!("{rendered}");
    Ok(())
}

/// Print field errors one per line, as `field: message`.
pub fn print_field_errors(errors: &FieldErrors) {
    for error in errors.iter() {
        println!("{}: {}", error.field(), error);
    }
}

/// Keep the field errors of a validation pass; anything else is a failure.
pub fn field_errors<T>(outcome: Result<T, SubmitError>) -> Result<FieldErrors, CliError> {
    match outcome {
        Ok(_) => Ok(FieldErrors::new()),
        Err(SubmitError::Validation(errors)) => Ok(errors),
        Err(other) => Err(other.into()),
    }
}

/// Outcome of a validation-only command, as printed in JSON mode.
#[derive(Debug, Serialize)]
pub struct CheckReport<'a> {
    /// Whether every rule passed.
    pub valid: bool,
    /// Failing fields, keyed by field name.
    pub errors: &'a FieldErrors,
}

/// Report a validation-only outcome and map failures to exit code 1.
pub fn report_check(
    format: OutputFormat,
    errors: &FieldErrors,
    global: &GlobalOptions,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => print_json(&CheckReport {
            valid: errors.is_empty(),
            errors,
        })?,
        OutputFormat::Human => {
            if errors.is_empty() {
                if !global.quiet {
                    println!("Valid");
                }
            } else {
                print_field_errors(errors);
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(CliError::Rejected(format!(
            "{} field(s) failed validation",
            errors.len()
        )))
    }
}
