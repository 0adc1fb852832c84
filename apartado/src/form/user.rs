//! The admin user form.

use crate::form::{Accepted, FormMachine, FormState, SubmitError};
use crate::model::{User, UserDraft, UserId, UserRequest};
use crate::service::{Notifier, UserService};
use crate::validation::{Field, FieldContext, FieldErrors, FieldRules, FormMode};

/// Banner shown when saving fails without a reason.
pub const USER_SAVE_FALLBACK: &str = "Error saving user";
/// Banner shown when deactivation fails.
pub const USER_DEACTIVATE_FALLBACK: &str = "Error deactivating user";

const FIELDS: [Field; 4] = [Field::Email, Field::FirstName, Field::LastName, Field::Password];

/// Orchestrates the create/edit user dialog.
///
/// When editing, a blank password keeps the current one and is left out of
/// the payload.
pub struct UserForm<'a, S: UserService + ?Sized, N: Notifier + ?Sized> {
    service: &'a S,
    notifier: &'a N,
    rules: FieldRules,
    editing: Option<UserId>,
    machine: FormMachine,
    errors: FieldErrors,
    banner: Option<String>,
}

impl<'a, S: UserService + ?Sized, N: Notifier + ?Sized> UserForm<'a, S, N> {
    /// A form creating a new account.
    pub fn new(service: &'a S, notifier: &'a N) -> Self {
        Self {
            service,
            notifier,
            rules: FieldRules::default(),
            editing: None,
            machine: FormMachine::new(),
            errors: FieldErrors::new(),
            banner: None,
        }
    }

    /// Uses custom minimum lengths.
    #[must_use]
    pub const fn with_rules(mut self, rules: FieldRules) -> Self {
        self.rules = rules;
        self
    }

    /// Edits account `id` instead of creating one.
    #[must_use]
    pub const fn editing(mut self, id: UserId) -> Self {
        self.editing = Some(id);
        self
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

    /// Banner message, if one is showing.
    #[must_use]
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    const fn mode(&self) -> FormMode {
        if self.editing.is_some() {
            FormMode::Edit
        } else {
            FormMode::Create
        }
    }

    /// The user typed in `field`.
    pub fn change(&mut self, field: Field) {
        self.errors.clear(field);
    }

    /// `field` lost focus.
    pub fn blur(&mut self, field: Field, draft: &UserDraft) {
        if let Some(value) = value_of(field, draft) {
            let ctx = FieldContext::new().with_mode(self.mode());
            if let Err(error) = self.rules.validate(field, value, &ctx) {
                self.errors.insert(error);
            }
        }
    }

    /// Runs the field rules and builds the payload.
    ///
    /// # Errors
    ///
    /// [`SubmitError::Validation`] with every failing field.
    pub fn validate(&self, draft: &UserDraft) -> Result<UserRequest, SubmitError> {
        let ctx = FieldContext::new().with_mode(self.mode());
        FIELDS
            .into_iter()
            .filter_map(|field| {
                let value = value_of(field, draft)?;
                self.rules.validate(field, value, &ctx).err()
            })
            .collect::<FieldErrors>()
            .into_result()
            .map_err(SubmitError::Validation)?;

        Ok(UserRequest {
            email: draft.email.trim().to_string(),
            first_name: draft.first_name.trim().to_string(),
            last_name: draft.last_name.trim().to_string(),
            role: draft.role,
            password: (!draft.password.is_empty()).then(|| draft.password.clone()),
            is_active: draft.is_active,
        })
    }

    /// Validates and saves the account.
    ///
    /// # Errors
    ///
    /// Field errors, or the backend's reason with [`USER_SAVE_FALLBACK`].
    pub fn submit(&mut self, draft: &UserDraft) -> Result<Accepted<User>, SubmitError> {
        self.machine.begin()?;
        self.banner = None;
        let request = match self.validate(draft) {
            Ok(request) => request,
            Err(err) => return Err(self.reject(err)),
        };
        self.errors = FieldErrors::new();

        self.machine.submitting();
        let outcome = match self.editing {
            Some(id) => self.service.update_user(id, &request),
            None => self.service.create_user(&request),
        };
        match outcome {
            Ok(user) => {
                self.machine.succeed(None);
                Ok(Accepted {
                    value: user,
                    message: None,
                    redirect: None,
                })
            }
            Err(err) => Err(self.reject(SubmitError::from_service(&err, USER_SAVE_FALLBACK))),
        }
    }

    /// Deactivates account `id`.
    ///
    /// # Errors
    ///
    /// The backend's reason with [`USER_DEACTIVATE_FALLBACK`].
    pub fn deactivate(&self, id: UserId) -> Result<(), SubmitError> {
        self.service
            .deactivate_user(id)
            .map_err(|err| SubmitError::from_service(&err, USER_DEACTIVATE_FALLBACK))
            .inspect_err(|err| {
                if let Some(banner) = err.banner() {
                    self.notifier.error(&banner);
                }
            })
    }

    fn reject(&mut self, err: SubmitError) -> SubmitError {
        if let SubmitError::Validation(errors) = &err {
            self.errors = errors.clone();
        } else if let Some(banner) = err.banner() {
            self.notifier.error(&banner);
            self.banner = Some(banner);
        }
        self.machine.fail();
        err
    }
}

fn value_of(field: Field, draft: &UserDraft) -> Option<&str> {
    match field {
        Field::Email => Some(draft.email.as_str()),
        Field::FirstName => Some(draft.first_name.as_str()),
        Field::LastName => Some(draft.last_name.as_str()),
        Field::Password => Some(draft.password.as_str()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;
    use crate::service::{MockNotifier, MockUserService, ServiceError};
    use crate::validation::FieldErrorKind;

    fn draft() -> UserDraft {
        UserDraft {
            email: "new@school.edu".into(),
            first_name: "New".into(),
            last_name: "Teacher".into(),
            role: Role::Teacher,
            password: "secret1".into(),
            is_active: true,
        }
    }

    fn saved(request: &UserRequest) -> User {
        User {
            id: UserId::new(5),
            email: request.email.clone(),
            first_name: request.first_name.clone(),
            last_name: request.last_name.clone(),
            role: request.role,
            is_active: request.is_active,
        }
    }

    #[test]
    fn test_create_requires_password() {
        let service = MockUserService::new();
        let notifier = MockNotifier::new();
        let form = UserForm::new(&service, &notifier);

        let mut input = draft();
        input.password.clear();
        let Err(SubmitError::Validation(errors)) = form.validate(&input) else {
            panic!("expected field errors");
        };
        assert_eq!(
            errors.get(Field::Password).map(|e| e.kind()),
            Some(FieldErrorKind::RequiredField)
        );
    }

    #[test]
    fn test_short_password_rejected() {
        let service = MockUserService::new();
        let notifier = MockNotifier::new();
        let form = UserForm::new(&service, &notifier).editing(UserId::new(5));

        let mut input = draft();
        input.password = "abc".into();
        let Err(SubmitError::Validation(errors)) = form.validate(&input) else {
            panic!("expected field errors");
        };
        assert_eq!(
            errors.message(Field::Password).as_deref(),
            Some("Password must be at least 6 characters")
        );
    }

    #[test]
    fn test_edit_omits_blank_password() {
        let mut service = MockUserService::new();
        service
            .expect_update_user()
            .withf(|id, request| *id == UserId::new(5) && request.password.is_none())
            .times(1)
            .returning(|_, request| Ok(saved(request)));
        let notifier = MockNotifier::new();

        let mut form = UserForm::new(&service, &notifier).editing(UserId::new(5));
        let mut input = draft();
        input.password.clear();
        let accepted = form.submit(&input).unwrap();
        assert_eq!(accepted.redirect, None);
        assert_eq!(form.state(), FormState::Success);
    }

    #[test]
    fn test_create_sends_password() {
        let mut service = MockUserService::new();
        service
            .expect_create_user()
            .withf(|request| request.password.as_deref() == Some("secret1"))
            .times(1)
            .returning(|request| Ok(saved(request)));
        let notifier = MockNotifier::new();

        let mut form = UserForm::new(&service, &notifier);
        assert!(form.submit(&draft()).is_ok());
    }

    #[test]
    fn test_save_failure_uses_detail_or_fallback() {
        let mut service = MockUserService::new();
        service
            .expect_create_user()
            .times(1)
            .returning(|_| Err(ServiceError::unreachable()));
        let mut notifier = MockNotifier::new();
        notifier
            .expect_error()
            .withf(|m| m == USER_SAVE_FALLBACK)
            .times(1)
            .returning(|_| ());

        let mut form = UserForm::new(&service, &notifier);
        form.submit(&draft()).unwrap_err();
        assert_eq!(form.banner(), Some(USER_SAVE_FALLBACK));
        assert_eq!(form.state(), FormState::Idle);
    }

    #[test]
    fn test_deactivate_failure() {
        let mut service = MockUserService::new();
        service
            .expect_deactivate_user()
            .returning(|_| Err(ServiceError::detail(403, "")));
        let mut notifier = MockNotifier::new();
        notifier.expect_error().times(1).returning(|_| ());

        let form = UserForm::new(&service, &notifier);
        let err = form.deactivate(UserId::new(2)).unwrap_err();
        assert_eq!(err.banner().as_deref(), Some(USER_DEACTIVATE_FALLBACK));
    }
}
