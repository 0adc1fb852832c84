//! Aggregated per-field errors of a form.

use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::validation::field::{Field, FieldError};

/// Errors of a form, at most one per field, kept in form order.
///
/// # Examples
///
/// ```
/// use apartado::validation::{Field, FieldError, FieldErrorKind, FieldErrors};
///
/// let mut errors = FieldErrors::new();
/// errors.insert(FieldError::new(Field::Title, FieldErrorKind::RequiredField));
/// assert_eq!(errors.message(Field::Title).as_deref(), Some("Title is required"));
///
/// // Typing in the field clears its error.
/// errors.clear(Field::Title);
/// assert!(errors.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: Vec<FieldError>,
}

impl FieldErrors {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Records an error, replacing any previous one for the same field.
    pub fn insert(&mut self, error: FieldError) {
        self.clear(error.field());
        let pos = self
            .errors
            .iter()
            .position(|e| e.field() > error.field())
            .unwrap_or(self.errors.len());
        self.errors.insert(pos, error);
    }

    /// Records the outcome of one validator; `Ok` clears the field.
    pub fn record(&mut self, field: Field, outcome: Result<(), FieldError>) {
        match outcome {
            Ok(()) => self.clear(field),
            Err(error) => self.insert(error),
        }
    }

    /// Drops the error of `field`, if any.
    pub fn clear(&mut self, field: Field) {
        self.errors.retain(|e| e.field() != field);
    }

    /// Error of `field`, if any.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field() == field)
    }

    /// Inline message of `field`, if any.
    #[must_use]
    pub fn message(&self, field: Field) -> Option<String> {
        self.get(field).map(FieldError::message)
    }

    /// Whether no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of failing fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Failing fields in form order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// `Ok(())` when empty, otherwise the errors themselves.
    ///
    /// # Errors
    ///
    /// Returns `self` if any field failed.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl FromIterator<FieldError> for FieldErrors {
    fn from_iter<I: IntoIterator<Item = FieldError>>(iter: I) -> Self {
        let mut errors = Self::new();
        for error in iter {
            errors.insert(error);
        }
        errors
    }
}

impl<'a> IntoIterator for &'a FieldErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {error}", error.field())?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

impl Serialize for FieldErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.errors.len()))?;
        for error in &self.errors {
            map.serialize_entry(error.field().name(), &error.message())?;
        }
        map.end()
    }
}
