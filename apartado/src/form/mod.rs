//! Form orchestrators.
//!
//! Each form aggregates its field rules, decides whether to submit, calls its
//! collaborator at most once per submission and maps the outcome back to
//! inline field errors or a single banner message. All of them move through
//! the same [`FormState`] machine.
//!
//! - [`ReservationForm`]: create or (admin) edit a reservation
//! - [`LoginForm`]: sign in
//! - [`UserForm`] and [`SpaceForm`]: admin maintenance screens
//! - [`DecisionForm`] and [`Cancellation`]: approve, reject or cancel

pub mod decision;
pub mod login;
pub mod reservation;
pub mod space;
pub mod state;
pub mod user;

use serde::Serialize;
use thiserror::Error;

use crate::service::ServiceError;
use crate::validation::{FieldErrors, PolicyViolation, ViolationKind};

pub use decision::{Cancellation, DecisionForm};
pub use login::LoginForm;
pub use reservation::ReservationForm;
pub use space::SpaceForm;
pub use state::{FormMachine, FormState, Redirect, Route};
pub use user::UserForm;

/// A backend failure reduced to what the user is shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteFailure {
    /// Response status, `None` when the backend never answered.
    pub status: Option<u16>,
    /// Banner message.
    pub message: String,
}

impl RemoteFailure {
    /// Picks the payload's `detail`, else its `error`, else `fallback`.
    ///
    /// # Examples
    ///
    /// ```
    /// use apartado::form::RemoteFailure;
    /// use apartado::service::ServiceError;
    ///
    /// let failure = RemoteFailure::from_service(
    ///     &ServiceError::unreachable(),
    ///     "Error creating reservation",
    /// );
    /// assert_eq!(failure.message, "Error creating reservation");
    /// ```
    #[must_use]
    pub fn from_service(err: &ServiceError, fallback: &str) -> Self {
        Self {
            status: err.status,
            message: err.payload.message().unwrap_or(fallback).to_string(),
        }
    }
}

/// Why a submission did not go through.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// Inline field errors; nothing was sent.
    #[error("{0}")]
    Validation(FieldErrors),
    /// The interval breaks the duration policy; nothing was sent.
    #[error("{0}")]
    Policy(PolicyViolation),
    /// The backend refused or failed the request.
    #[error("{}", .0.message)]
    Remote(RemoteFailure),
    /// The backend refused the credentials or the role.
    #[error("{}", .0.message)]
    Auth(RemoteFailure),
    /// A submission is already in flight.
    #[error("a submission is already in progress")]
    Busy,
    /// The form already succeeded and is redirecting.
    #[error("the form has already been submitted")]
    Completed,
}

impl SubmitError {
    /// Maps a collaborator failure; 401 becomes [`SubmitError::Auth`].
    #[must_use]
    pub fn from_service(err: &ServiceError, fallback: &str) -> Self {
        let failure = RemoteFailure::from_service(err, fallback);
        if err.is_unauthorized() {
            Self::Auth(failure)
        } else {
            Self::Remote(failure)
        }
    }

    /// Taxonomy entry, if the submission was refused rather than throttled.
    #[must_use]
    pub fn kind(&self) -> Option<ViolationKind> {
        match self {
            Self::Validation(errors) => errors.iter().next().map(|e| e.kind().kind()),
            Self::Policy(violation) => Some(violation.kind()),
            Self::Remote(_) => Some(ViolationKind::RemoteError),
            Self::Auth(_) => Some(ViolationKind::AuthError),
            Self::Busy | Self::Completed => None,
        }
    }

    /// The single banner message, for every error that is not inline.
    #[must_use]
    pub fn banner(&self) -> Option<String> {
        match self {
            Self::Validation(_) | Self::Busy | Self::Completed => None,
            Self::Policy(violation) => Some(violation.to_string()),
            Self::Remote(failure) | Self::Auth(failure) => Some(failure.message.clone()),
        }
    }
}

/// A submission the collaborator accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Accepted<T> {
    /// What the collaborator returned.
    pub value: T,
    /// Success message handed to the notifier.
    pub message: Option<String>,
    /// Navigation the form started, if any.
    pub redirect: Option<Redirect>,
}
