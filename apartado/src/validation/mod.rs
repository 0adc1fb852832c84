//! Client-side admission rules.
//!
//! This module contains the pure rules a request must pass before it is
//! submitted:
//!
//! - [`field`]: per-field rules (title, dates, e-mail, password, names)
//! - [`duration`]: the reservation length policy
//! - [`errors`]: aggregation of field errors for a whole form
//!
//! All functions here are pure: identical inputs give identical results.

pub mod duration;
pub mod errors;
pub mod field;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

use std::fmt;

use chrono::{DateTime, NaiveDateTime};
use serde::Serialize;

pub use duration::{
    overlaps, DurationPolicy, PolicyViolation, DEFAULT_MAX_DURATION_MINUTES,
    DEFAULT_MIN_DURATION_MINUTES, MAX_POLICY_DURATION_MINUTES,
};
pub use errors::FieldErrors;
pub use field::{
    validate_field, Field, FieldContext, FieldError, FieldErrorKind, FieldRules, FormMode,
};

/// The error taxonomy shared by field, policy and remote failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// A required field is blank.
    RequiredField,
    /// A value or interval is too short.
    TooShort,
    /// An interval is too long.
    TooLong,
    /// A value has the wrong shape.
    InvalidFormat,
    /// An end is not after its start.
    OrderViolation,
    /// Start or end date missing for the duration check.
    MissingDates,
    /// A start date lies in the past.
    InPast,
    /// The backend failed or refused the request.
    RemoteError,
    /// The backend refused the credentials or the role.
    AuthError,
}

impl ViolationKind {
    /// Stable snake-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RequiredField => "required_field",
            Self::TooShort => "too_short",
            Self::TooLong => "too_long",
            Self::InvalidFormat => "invalid_format",
            Self::OrderViolation => "order_violation",
            Self::MissingDates => "missing_dates",
            Self::InPast => "in_past",
            Self::RemoteError => "remote_error",
            Self::AuthError => "auth_error",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses a date-and-time field value.
///
/// Accepts the `datetime-local` shape (`2025-01-01T10:00`), optional
/// seconds, a space instead of `T`, and RFC 3339 strings with an offset
/// (converted to UTC). Returns `None` for anything else.
///
/// # Examples
///
/// ```
/// use apartado::validation::parse_timestamp;
///
/// assert!(parse_timestamp("2025-01-01T10:00").is_some());
/// assert!(parse_timestamp("2025-01-01T10:00:00Z").is_some());
/// assert!(parse_timestamp("next tuesday").is_none());
/// ```
#[must_use]
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.naive_utc())
        })
}
