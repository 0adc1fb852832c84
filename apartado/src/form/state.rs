//! Submission state machine shared by every form.

use std::time::Duration;

use serde::Serialize;

use crate::form::SubmitError;

/// Screens a form can send the user to after success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// Main page.
    Home,
    /// The user's own reservations.
    MyReservations,
}

impl Route {
    /// URL path of the screen.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::MyReservations => "/my-reservations",
        }
    }
}

/// A pending navigation after a fixed delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Redirect {
    /// Target screen.
    pub route: Route,
    /// Time the success message stays on screen first.
    #[serde(rename = "delay_ms", serialize_with = "as_millis")]
    pub delay: Duration,
}

fn as_millis<S: serde::Serializer>(delay: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(delay.as_millis()).unwrap_or(u64::MAX))
}

impl Redirect {
    /// A redirect to `route` after `delay`.
    #[must_use]
    pub const fn new(route: Route, delay: Duration) -> Self {
        Self { route, delay }
    }
}

/// Where a form is in its submission lifecycle.
///
/// ```text
/// Idle -> Validating -> Submitting -> Success -> Redirecting
///             |              |
///             +-> Idle       +-> Idle
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormState {
    /// Accepting input.
    #[default]
    Idle,
    /// Running the client-side rules.
    Validating,
    /// Waiting for the collaborator; the submit control is disabled.
    Submitting,
    /// The collaborator accepted the request.
    Success,
    /// Showing the success message before navigating away. Terminal.
    Redirecting(Redirect),
}

/// Drives [`FormState`] transitions and remembers every state visited.
///
/// # Examples
///
/// ```
/// use apartado::form::{FormMachine, FormState, SubmitError};
///
/// let mut machine = FormMachine::new();
/// machine.begin().unwrap();
/// machine.submitting();
/// assert!(matches!(machine.begin(), Err(SubmitError::Busy)));
/// machine.fail();
/// assert_eq!(machine.state(), FormState::Idle);
/// ```
#[derive(Debug, Clone)]
pub struct FormMachine {
    state: FormState,
    history: Vec<FormState>,
}

impl Default for FormMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl FormMachine {
    /// A machine in `Idle`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: FormState::Idle,
            history: vec![FormState::Idle],
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> FormState {
        self.state
    }

    /// Every state entered so far, oldest first.
    #[must_use]
    pub fn history(&self) -> &[FormState] {
        &self.history
    }

    /// Whether a submission is in flight.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        matches!(self.state, FormState::Validating | FormState::Submitting)
    }

    fn enter(&mut self, next: FormState) {
        log::debug!("form state {:?} -> {:?}", self.state, next);
        self.state = next;
        self.history.push(next);
    }

    /// Starts a submission by entering `Validating`.
    ///
    /// # Errors
    ///
    /// [`SubmitError::Busy`] while a submission is in flight and
    /// [`SubmitError::Completed`] once the form is redirecting.
    pub fn begin(&mut self) -> Result<(), SubmitError> {
        match self.state {
            FormState::Validating | FormState::Submitting => Err(SubmitError::Busy),
            FormState::Redirecting(_) => Err(SubmitError::Completed),
            FormState::Idle | FormState::Success => {
                self.enter(FormState::Validating);
                Ok(())
            }
        }
    }

    /// Validation passed; the collaborator is about to be called.
    pub fn submitting(&mut self) {
        debug_assert_eq!(self.state, FormState::Validating);
        self.enter(FormState::Submitting);
    }

    /// The collaborator accepted; optionally start redirecting.
    pub fn succeed(&mut self, redirect: Option<Redirect>) {
        self.enter(FormState::Success);
        if let Some(redirect) = redirect {
            self.enter(FormState::Redirecting(redirect));
        }
    }

    /// Validation or the collaborator failed; back to `Idle`.
    pub fn fail(&mut self) {
        self.enter(FormState::Idle);
    }

    /// Whether the machine ever reached `state`.
    #[must_use]
    pub fn visited(&self, state: FormState) -> bool {
        self.history.contains(&state)
    }
}
