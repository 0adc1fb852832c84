//! Error types for the apartado library.
//!
//! Rule violations (field and policy) and backend refusals share one error
//! enum with the ambient failures (I/O, configuration), so callers can use
//! `?` throughout and sort errors with [`Error::violation_kind`].

use std::path::PathBuf;

use thiserror::Error;

use crate::form::SubmitError;
use crate::validation::{FieldError, FieldErrors, PolicyViolation, ViolationKind};

/// Result type alias for operations that may fail with an apartado error.
///
/// # Examples
///
/// ```
/// use apartado::{Error, Result};
///
/// fn example_operation() -> Result<i64> {
///     Ok(60)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the apartado library.
#[derive(Debug, Error)]
pub enum Error {
    /// One or more form fields failed validation.
    #[error("invalid input: {0}")]
    Fields(FieldErrors),

    /// The requested interval breaks the duration policy.
    #[error("{0}")]
    Policy(#[from] PolicyViolation),

    /// The backend refused or failed the request.
    #[error("{message}")]
    Remote {
        /// HTTP-like status code, if the backend answered.
        status: Option<u16>,
        /// Message shown to the user.
        message: String,
    },

    /// The backend refused the credentials or the caller's role.
    #[error("{message}")]
    Auth {
        /// Message shown to the user.
        message: String,
    },

    /// A submission is already in flight.
    #[error("a submission is already in progress")]
    Busy,

    /// The form already completed and is redirecting.
    #[error("the form has already been submitted")]
    FormClosed,

    /// A timestamp could not be parsed.
    #[error("invalid timestamp '{value}'")]
    InvalidTimestamp {
        /// The rejected input.
        value: String,
    },

    /// An invalid filesystem path was provided.
    #[error("invalid path {}: {reason}", path.display())]
    InvalidPath {
        /// The invalid path.
        path: PathBuf,
        /// The reason the path is invalid.
        reason: String,
    },

    /// A configuration error occurred.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration or argument value failed validation.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// The requested resource was not found.
    #[error("not found: {resource}")]
    NotFound {
        /// The resource that was not found.
        resource: String,
    },
}

impl From<FieldError> for Error {
    fn from(err: FieldError) -> Self {
        Self::Fields(std::iter::once(err).collect())
    }
}

impl From<FieldErrors> for Error {
    fn from(errors: FieldErrors) -> Self {
        Self::Fields(errors)
    }
}

impl From<SubmitError> for Error {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::Validation(errors) => Self::Fields(errors),
            SubmitError::Policy(violation) => Self::Policy(violation),
            SubmitError::Remote(failure) => Self::Remote {
                status: failure.status,
                message: failure.message,
            },
            SubmitError::Auth(failure) => Self::Auth {
                message: failure.message,
            },
            SubmitError::Busy => Self::Busy,
            SubmitError::Completed => Self::FormClosed,
        }
    }
}

impl Error {
    /// Taxonomy entry for rule violations and backend refusals.
    ///
    /// Returns `None` for ambient failures such as I/O or configuration
    /// errors. Field errors report the kind of their first failing field.
    ///
    /// # Examples
    ///
    /// ```
    /// use apartado::validation::{PolicyViolation, ViolationKind};
    /// use apartado::Error;
    ///
    /// let err = Error::from(PolicyViolation::MissingDates);
    /// assert_eq!(err.violation_kind(), Some(ViolationKind::MissingDates));
    /// ```
    #[must_use]
    pub fn violation_kind(&self) -> Option<ViolationKind> {
        match self {
            Self::Fields(errors) => errors.iter().next().map(|e| e.kind().kind()),
            Self::Policy(violation) => Some(violation.kind()),
            Self::Remote { .. } => Some(ViolationKind::RemoteError),
            Self::Auth { .. } => Some(ViolationKind::AuthError),
            _ => None,
        }
    }

    /// Whether the input was refused by a rule or by the backend, as
    /// opposed to the tool itself failing.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        self.violation_kind().is_some()
    }
}
