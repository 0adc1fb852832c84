//! Per-field validation rules.
//!
//! Every form in the application is made of a handful of named fields. Each
//! field has exactly one canonical rule set here; the forms only decide which
//! fields they show and in which [`FormMode`] they run.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validation::{parse_timestamp, ViolationKind};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// Minimum title length.
pub const DEFAULT_TITLE_MIN_LENGTH: usize = 3;
/// Minimum password length on user forms.
pub const DEFAULT_PASSWORD_MIN_LENGTH: usize = 6;
/// Minimum space name length.
pub const DEFAULT_SPACE_NAME_MIN_LENGTH: usize = 2;

/// A validated form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Reservation title.
    Title,
    /// Reservation start date and time.
    StartAt,
    /// Reservation end date and time.
    EndAt,
    /// Login or account e-mail.
    Email,
    /// Login or account password.
    Password,
    /// Account given name.
    FirstName,
    /// Account surname.
    LastName,
    /// Space name.
    SpaceName,
    /// Space description.
    SpaceDescription,
    /// Space location.
    SpaceLocation,
}

impl Field {
    /// Every field, in form order.
    pub const ALL: [Self; 10] = [
        Self::Title,
        Self::StartAt,
        Self::EndAt,
        Self::Email,
        Self::Password,
        Self::FirstName,
        Self::LastName,
        Self::SpaceName,
        Self::SpaceDescription,
        Self::SpaceLocation,
    ];

    /// Form field name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::StartAt => "start_at",
            Self::EndAt => "end_at",
            Self::Email => "email",
            Self::Password => "password",
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::SpaceName => "space_name",
            Self::SpaceDescription => "space_description",
            Self::SpaceLocation => "space_location",
        }
    }

    /// Label used at the start of error messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::StartAt => "Start date",
            Self::EndAt => "End date",
            Self::Email => "Email",
            Self::Password => "Password",
            Self::FirstName | Self::SpaceName => "Name",
            Self::LastName => "Surname",
            Self::SpaceDescription => "Description",
            Self::SpaceLocation => "Location",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|field| field.name() == normalized)
            .ok_or_else(|| format!("unknown field: {s}"))
    }
}

/// Which variant of a form is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
    /// Creating a new record.
    #[default]
    Create,
    /// Editing an existing record; an empty password keeps the old one.
    Edit,
    /// The login screen; passwords are only checked for presence.
    Login,
}

/// What went wrong with a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorKind {
    /// The field is blank.
    RequiredField,
    /// The value is shorter than `min` characters.
    TooShort {
        /// Minimum accepted length.
        min: usize,
    },
    /// The value does not have the expected shape.
    InvalidFormat,
    /// The end date is not after the start date.
    OrderViolation,
    /// The start date lies before "now".
    InPast,
}

impl FieldErrorKind {
    /// Taxonomy entry of this error.
    #[must_use]
    pub const fn kind(self) -> ViolationKind {
        match self {
            Self::RequiredField => ViolationKind::RequiredField,
            Self::TooShort { .. } => ViolationKind::TooShort,
            Self::InvalidFormat => ViolationKind::InvalidFormat,
            Self::OrderViolation => ViolationKind::OrderViolation,
            Self::InPast => ViolationKind::InPast,
        }
    }
}

/// A field that failed its rule; `Display` gives the inline message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{}", self.message())]
pub struct FieldError {
    field: Field,
    kind: FieldErrorKind,
}

impl FieldError {
    /// Creates an error for `field`.
    #[must_use]
    pub const fn new(field: Field, kind: FieldErrorKind) -> Self {
        Self { field, kind }
    }

    /// The offending field.
    #[must_use]
    pub const fn field(&self) -> Field {
        self.field
    }

    /// What went wrong.
    #[must_use]
    pub const fn kind(&self) -> FieldErrorKind {
        self.kind
    }

    /// Human-readable message shown next to the field.
    #[must_use]
    pub fn message(&self) -> String {
        let label = self.field.label();
        match (self.field, self.kind) {
            (_, FieldErrorKind::RequiredField) => format!("{label} is required"),
            (_, FieldErrorKind::TooShort { min }) => {
                format!("{label} must be at least {min} characters")
            }
            (Field::Email, FieldErrorKind::InvalidFormat) => "Please enter a valid email".into(),
            (_, FieldErrorKind::InvalidFormat) => format!("{label} is not a valid date and time"),
            (_, FieldErrorKind::OrderViolation) => format!("{label} must be after start date"),
            (_, FieldErrorKind::InPast) => format!("{label} cannot be in the past"),
        }
    }
}

/// Cross-field inputs a rule may need.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldContext {
    start_at: Option<NaiveDateTime>,
    now: Option<NaiveDateTime>,
    mode: FormMode,
}

impl FieldContext {
    /// Context for a creation form with no cross-field input.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            start_at: None,
            now: None,
            mode: FormMode::Create,
        }
    }

    /// Supplies the current start date, checked against `end_at`.
    #[must_use]
    pub const fn with_start_at(mut self, start_at: Option<NaiveDateTime>) -> Self {
        self.start_at = start_at;
        self
    }

    /// Enables the "start cannot be in the past" rule.
    #[must_use]
    pub const fn with_now(mut self, now: NaiveDateTime) -> Self {
        self.now = Some(now);
        self
    }

    /// Selects the form variant.
    #[must_use]
    pub const fn with_mode(mut self, mode: FormMode) -> Self {
        self.mode = mode;
        self
    }

    /// The form variant.
    #[must_use]
    pub const fn mode(&self) -> FormMode {
        self.mode
    }
}

/// Configurable minimum lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRules {
    /// Minimum title length.
    pub title_min_length: usize,
    /// Minimum password length on user forms.
    pub password_min_length: usize,
    /// Minimum space name length.
    pub space_name_min_length: usize,
}

impl Default for FieldRules {
    fn default() -> Self {
        Self {
            title_min_length: DEFAULT_TITLE_MIN_LENGTH,
            password_min_length: DEFAULT_PASSWORD_MIN_LENGTH,
            space_name_min_length: DEFAULT_SPACE_NAME_MIN_LENGTH,
        }
    }
}

impl FieldRules {
    /// Validates one field value.
    ///
    /// # Errors
    ///
    /// Returns the first rule of `field` that `value` breaks.
    ///
    /// # Examples
    ///
    /// ```
    /// use apartado::validation::{Field, FieldContext, FieldErrorKind, FieldRules};
    ///
    /// let rules = FieldRules::default();
    /// let ctx = FieldContext::new();
    /// let err = rules.validate(Field::Title, "ab", &ctx).unwrap_err();
    /// assert_eq!(err.kind(), FieldErrorKind::TooShort { min: 3 });
    /// assert_eq!(err.to_string(), "Title must be at least 3 characters");
    /// assert!(rules.validate(Field::Title, "abc", &ctx).is_ok());
    /// ```
    pub fn validate(&self, field: Field, value: &str, ctx: &FieldContext) -> Result<(), FieldError> {
        let fail = |kind| Err(FieldError::new(field, kind));
        match field {
            Field::Title => {
                required(field, value)?;
                min_length(field, value.trim(), self.title_min_length)
            }
            Field::StartAt => {
                let start = timestamp(field, value)?;
                match ctx.now {
                    Some(now) if start < now => fail(FieldErrorKind::InPast),
                    _ => Ok(()),
                }
            }
            Field::EndAt => {
                let end = timestamp(field, value)?;
                match ctx.start_at {
                    Some(start) if end <= start => fail(FieldErrorKind::OrderViolation),
                    _ => Ok(()),
                }
            }
            Field::Email => {
                required(field, value)?;
                if EMAIL_PATTERN.is_match(value) {
                    Ok(())
                } else {
                    fail(FieldErrorKind::InvalidFormat)
                }
            }
            Field::Password => self.validate_password(value, ctx.mode),
            Field::SpaceName => {
                required(field, value)?;
                min_length(field, value.trim(), self.space_name_min_length)
            }
            Field::FirstName | Field::LastName | Field::SpaceDescription | Field::SpaceLocation => {
                required(field, value)
            }
        }
    }

    fn validate_password(&self, value: &str, mode: FormMode) -> Result<(), FieldError> {
        match mode {
            FormMode::Login => required(Field::Password, value),
            FormMode::Create if value.is_empty() => Err(FieldError::new(
                Field::Password,
                FieldErrorKind::RequiredField,
            )),
            FormMode::Create | FormMode::Edit if value.is_empty() => Ok(()),
            FormMode::Create | FormMode::Edit => {
                min_length(Field::Password, value, self.password_min_length)
            }
        }
    }
}

fn required(field: Field, value: &str) -> Result<(), FieldError> {
    if value.trim().is_empty() {
        Err(FieldError::new(field, FieldErrorKind::RequiredField))
    } else {
        Ok(())
    }
}

fn min_length(field: Field, value: &str, min: usize) -> Result<(), FieldError> {
    if value.chars().count() < min {
        Err(FieldError::new(field, FieldErrorKind::TooShort { min }))
    } else {
        Ok(())
    }
}

fn timestamp(field: Field, value: &str) -> Result<NaiveDateTime, FieldError> {
    required(field, value)?;
    parse_timestamp(value).ok_or(FieldError::new(field, FieldErrorKind::InvalidFormat))
}

/// Validates one field with the default rule lengths.
///
/// # Errors
///
/// Returns the first rule of `field` that `value` breaks.
///
/// # Examples
///
/// ```
/// use apartado::validation::{validate_field, Field, FieldContext, FieldErrorKind};
///
/// let err = validate_field(Field::Title, "", &FieldContext::new()).unwrap_err();
/// assert_eq!(err.kind(), FieldErrorKind::RequiredField);
/// ```
pub fn validate_field(field: Field, value: &str, ctx: &FieldContext) -> Result<(), FieldError> {
    FieldRules::default().validate(field, value, ctx)
}
