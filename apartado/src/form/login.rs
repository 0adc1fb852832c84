//! The login form.

use std::time::Duration;

use crate::form::{Accepted, FormMachine, FormState, Redirect, RemoteFailure, Route, SubmitError};
use crate::model::{Credentials, User};
use crate::service::{AuthService, Notifier};
use crate::validation::{Field, FieldContext, FieldErrors, FieldRules, FormMode};

/// Shown once the credentials are accepted.
pub const LOGIN_SUCCESS: &str = "Redirecting to main page, wait a minute...";
/// Shown when the backend answers 401.
pub const LOGIN_REJECTED: &str = "Error, wrong credentials, try again...";
/// Shown for every other failure, including no answer at all.
pub const LOGIN_UNAVAILABLE: &str = "Error, server busy, try again later...";
/// Time the success message stays up before redirecting home.
pub const LOGIN_REDIRECT_DELAY: Duration = Duration::from_millis(1500);

/// Orchestrates the login form.
///
/// The form owns the credentials being typed so that a rejected login can
/// clear them.
pub struct LoginForm<'a, A: AuthService + ?Sized, N: Notifier + ?Sized> {
    service: &'a A,
    notifier: &'a N,
    rules: FieldRules,
    redirect_delay: Duration,
    credentials: Credentials,
    machine: FormMachine,
    errors: FieldErrors,
}

impl<'a, A: AuthService + ?Sized, N: Notifier + ?Sized> LoginForm<'a, A, N> {
    /// An empty login form.
    pub fn new(service: &'a A, notifier: &'a N) -> Self {
        Self {
            service,
            notifier,
            rules: FieldRules::default(),
            redirect_delay: LOGIN_REDIRECT_DELAY,
            credentials: Credentials::default(),
            machine: FormMachine::new(),
            errors: FieldErrors::new(),
        }
    }

    /// Changes the delay before redirecting.
    #[must_use]
    pub const fn with_redirect_delay(mut self, delay: Duration) -> Self {
        self.redirect_delay = delay;
        self
    }

    /// Types into the e-mail field.
    pub fn set_email(&mut self, email: impl Into<String>) {
        self.credentials.email = email.into();
        self.errors.clear(Field::Email);
    }

    /// Types into the password field.
    pub fn set_password(&mut self, password: impl Into<String>) {
        self.credentials.password = password.into();
        self.errors.clear(Field::Password);
    }

    /// What is currently typed.
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Current submission state.
    #[must_use]
    pub const fn state(&self) -> FormState {
        self.machine.state()
    }

    /// Inline field errors.
    #[must_use]
    pub const fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    fn check(&self, field: Field) -> Result<(), crate::validation::FieldError> {
        let ctx = FieldContext::new().with_mode(FormMode::Login);
        let value = match field {
            Field::Email => &self.credentials.email,
            _ => &self.credentials.password,
        };
        self.rules.validate(field, value, &ctx)
    }

    /// E-mail or password lost focus.
    pub fn blur(&mut self, field: Field) {
        if matches!(field, Field::Email | Field::Password) {
            self.errors.record(field, self.check(field));
        }
    }

    /// Checks both fields without submitting.
    ///
    /// # Errors
    ///
    /// [`SubmitError::Validation`] with every failing field.
    pub fn validate(&self) -> Result<(), SubmitError> {
        [Field::Email, Field::Password]
            .into_iter()
            .filter_map(|field| self.check(field).err())
            .collect::<FieldErrors>()
            .into_result()
            .map_err(SubmitError::Validation)
    }

    /// Validates and signs in.
    ///
    /// # Errors
    ///
    /// [`SubmitError::Auth`] with [`LOGIN_REJECTED`] on 401, after which both
    /// fields are empty; [`SubmitError::Remote`] with [`LOGIN_UNAVAILABLE`]
    /// for anything else the backend does.
    pub fn submit(&mut self) -> Result<Accepted<User>, SubmitError> {
        self.machine.begin()?;
        if let Err(err) = self.validate() {
            if let SubmitError::Validation(errors) = &err {
                self.errors = errors.clone();
            }
            self.machine.fail();
            return Err(err);
        }
        self.errors = FieldErrors::new();

        self.machine.submitting();
        match self.service.login(&self.credentials) {
            Ok(user) => {
                self.notifier.success(LOGIN_SUCCESS);
                let redirect = Redirect::new(Route::Home, self.redirect_delay);
                self.machine.succeed(Some(redirect));
                Ok(Accepted {
                    value: user,
                    message: Some(LOGIN_SUCCESS.to_string()),
                    redirect: Some(redirect),
                })
            }
            Err(err) => {
                let failed = if err.is_unauthorized() {
                    self.credentials.clear();
                    SubmitError::Auth(RemoteFailure {
                        status: err.status,
                        message: LOGIN_REJECTED.to_string(),
                    })
                } else {
                    SubmitError::Remote(RemoteFailure {
                        status: err.status,
                        message: LOGIN_UNAVAILABLE.to_string(),
                    })
                };
                if let Some(banner) = failed.banner() {
                    self.notifier.error(&banner);
                }
                self.machine.fail();
                Err(failed)
            }
        }
    }
}
