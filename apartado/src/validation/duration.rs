//! Reservation duration policy.
//!
//! The policy is a pre-filter run before a reservation is submitted: it
//! checks that both bounds are present, that the interval is ordered and that
//! its length stays inside the configured window. Overlap with other
//! reservations is left to the backend of record; [`overlaps`] is the
//! interval test it uses.

use std::fmt;

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::error::{Error, Result};
use crate::validation::ViolationKind;

/// Shortest bookable interval, in minutes.
pub const DEFAULT_MIN_DURATION_MINUTES: i64 = 30;
/// Longest bookable interval, in minutes.
pub const DEFAULT_MAX_DURATION_MINUTES: i64 = 240;
/// Upper limit for either configured bound: one week.
pub const MAX_POLICY_DURATION_MINUTES: i64 = 7 * 24 * 60;

/// Why a start/end pair was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PolicyViolation {
    /// One or both bounds are missing.
    #[error("You must specify the start and end dates.")]
    MissingDates,
    /// The end is not strictly after the start.
    #[error("The end date must be after the start date.")]
    OrderViolation,
    /// The interval is shorter than the minimum.
    #[error("The minimum duration is {}.", Span(*.min))]
    TooShort {
        /// Whole minutes requested.
        minutes: i64,
        /// Policy minimum.
        min: i64,
    },
    /// The interval is longer than the maximum.
    #[error("The maximum duration is {}.", Span(*.max))]
    TooLong {
        /// Whole minutes requested.
        minutes: i64,
        /// Policy maximum.
        max: i64,
    },
}

impl PolicyViolation {
    /// Taxonomy entry of this violation.
    #[must_use]
    pub const fn kind(&self) -> ViolationKind {
        match self {
            Self::MissingDates => ViolationKind::MissingDates,
            Self::OrderViolation => ViolationKind::OrderViolation,
            Self::TooShort { .. } => ViolationKind::TooShort,
            Self::TooLong { .. } => ViolationKind::TooLong,
        }
    }
}

/// Renders a minute count as "4 hours", "1 hour" or "30 minutes".
struct Span(i64);

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            60 => write!(f, "1 hour"),
            m if m > 0 && m % 60 == 0 => write!(f, "{} hours", m / 60),
            1 => write!(f, "1 minute"),
            m => write!(f, "{m} minutes"),
        }
    }
}

/// Minimum and maximum reservation length.
///
/// # Examples
///
/// ```
/// use apartado::validation::{parse_timestamp, DurationPolicy, PolicyViolation};
///
/// let policy = DurationPolicy::default();
/// let start = parse_timestamp("2025-01-01T10:00");
/// let end = parse_timestamp("2025-01-01T10:20");
/// assert!(matches!(
///     policy.validate(start, end),
///     Some(PolicyViolation::TooShort { minutes: 20, .. })
/// ));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationPolicy {
    min_minutes: i64,
    max_minutes: i64,
}

impl Default for DurationPolicy {
    fn default() -> Self {
        Self {
            min_minutes: DEFAULT_MIN_DURATION_MINUTES,
            max_minutes: DEFAULT_MAX_DURATION_MINUTES,
        }
    }
}

impl DurationPolicy {
    /// Creates a policy with custom bounds.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `min_minutes` is not positive,
    /// `max_minutes` is below it, or `max_minutes` exceeds
    /// [`MAX_POLICY_DURATION_MINUTES`].
    pub fn new(min_minutes: i64, max_minutes: i64) -> Result<Self> {
        if min_minutes <= 0 {
            return Err(Error::Validation {
                field: "policy.min_duration_minutes".into(),
                message: "minimum duration must be greater than 0".into(),
            });
        }
        if max_minutes > MAX_POLICY_DURATION_MINUTES {
            return Err(Error::Validation {
                field: "policy.max_duration_minutes".into(),
                message: format!(
                    "maximum duration cannot exceed {MAX_POLICY_DURATION_MINUTES} minutes"
                ),
            });
        }
        if max_minutes < min_minutes {
            return Err(Error::Validation {
                field: "policy.max_duration_minutes".into(),
                message: "maximum duration must be >= minimum duration".into(),
            });
        }
        Ok(Self {
            min_minutes,
            max_minutes,
        })
    }

    /// Minimum length in minutes.
    #[must_use]
    pub const fn min_minutes(&self) -> i64 {
        self.min_minutes
    }

    /// Maximum length in minutes.
    #[must_use]
    pub const fn max_minutes(&self) -> i64 {
        self.max_minutes
    }

    /// Checks a start/end pair.
    ///
    /// Rules run in a fixed order and the first failure wins: missing
    /// bounds, ordering, minimum length, maximum length. Lengths are compared
    /// to the second, so 29m59s is too short and 4h00m01s too long.
    #[must_use]
    pub fn validate(
        &self,
        start_at: Option<NaiveDateTime>,
        end_at: Option<NaiveDateTime>,
    ) -> Option<PolicyViolation> {
        let (Some(start), Some(end)) = (start_at, end_at) else {
            return Some(PolicyViolation::MissingDates);
        };
        if start >= end {
            return Some(PolicyViolation::OrderViolation);
        }

        let seconds = (end - start).num_seconds();
        let minutes = seconds / 60;
        if seconds < self.min_minutes.saturating_mul(60) {
            return Some(PolicyViolation::TooShort {
                minutes,
                min: self.min_minutes,
            });
        }
        if seconds > self.max_minutes.saturating_mul(60) {
            return Some(PolicyViolation::TooLong {
                minutes,
                max: self.max_minutes,
            });
        }
        None
    }

    /// Like [`validate`](Self::validate) but as a `Result`.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn check(
        &self,
        start_at: Option<NaiveDateTime>,
        end_at: Option<NaiveDateTime>,
    ) -> std::result::Result<(), PolicyViolation> {
        self.validate(start_at, end_at).map_or(Ok(()), Err)
    }
}

/// Whether two half-open intervals `[start, end)` share any instant.
#[must_use]
pub fn overlaps(a: (NaiveDateTime, NaiveDateTime), b: (NaiveDateTime, NaiveDateTime)) -> bool {
    a.0 < b.1 && a.1 > b.0
}
