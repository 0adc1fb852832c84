//! The admin space form.

use crate::form::{Accepted, FormMachine, FormState, SubmitError};
use crate::model::{Space, SpaceDraft, SpaceId, SpaceRequest};
use crate::service::{Notifier, SpaceService};
use crate::validation::{Field, FieldContext, FieldErrors, FieldRules};

/// Banner shown when saving fails without a reason.
pub const SPACE_SAVE_FALLBACK: &str = "Error saving that space";
/// Banner shown when deactivation fails.
pub const SPACE_DEACTIVATE_FALLBACK: &str = "Error deleting that space";

const FIELDS: [Field; 3] = [Field::SpaceName, Field::SpaceDescription, Field::SpaceLocation];

/// Orchestrates the create/edit space dialog.
pub struct SpaceForm<'a, S: SpaceService + ?Sized, N: Notifier + ?Sized> {
    service: &'a S,
    notifier: &'a N,
    rules: FieldRules,
    editing: Option<SpaceId>,
    machine: FormMachine,
    errors: FieldErrors,
    banner: Option<String>,
}

impl<'a, S: SpaceService + ?Sized, N: Notifier + ?Sized> SpaceForm<'a, S, N> {
    /// A form creating a new space.
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

    /// Edits space `id` instead of creating one.
    #[must_use]
    pub const fn editing(mut self, id: SpaceId) -> Self {
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

    /// Runs the field rules and builds the payload.
    ///
    /// # Errors
    ///
    /// [`SubmitError::Validation`] with every failing field.
    pub fn validate(&self, draft: &SpaceDraft) -> Result<SpaceRequest, SubmitError> {
        let ctx = FieldContext::new();
        FIELDS
            .into_iter()
            .filter_map(|field| {
                let value = match field {
                    Field::SpaceName => &draft.name,
                    Field::SpaceDescription => &draft.description,
                    _ => &draft.location,
                };
                self.rules.validate(field, value, &ctx).err()
            })
            .collect::<FieldErrors>()
            .into_result()
            .map_err(SubmitError::Validation)?;

        Ok(SpaceRequest {
            name: draft.name.trim().to_string(),
            description: draft.description.trim().to_string(),
            location: draft.location.trim().to_string(),
            is_active: draft.is_active,
        })
    }

    /// Validates and saves the space.
    ///
    /// # Errors
    ///
    /// Field errors, or the backend's reason with [`SPACE_SAVE_FALLBACK`].
    pub fn submit(&mut self, draft: &SpaceDraft) -> Result<Accepted<Space>, SubmitError> {
        self.machine.begin()?;
        self.banner = None;
        let request = match self.validate(draft) {
            Ok(request) => request,
            Err(err) => return Err(self.reject(err)),
        };
        self.errors = FieldErrors::new();

        self.machine.submitting();
        let outcome = match self.editing {
            Some(id) => self.service.update_space(id, &request),
            None => self.service.create_space(&request),
        };
        match outcome {
            Ok(space) => {
                self.machine.succeed(None);
                Ok(Accepted {
                    value: space,
                    message: None,
                    redirect: None,
                })
            }
            Err(err) => Err(self.reject(SubmitError::from_service(&err, SPACE_SAVE_FALLBACK))),
        }
    }

    /// Hides space `id` from the selection control.
    ///
    /// # Errors
    ///
    /// The backend's reason with [`SPACE_DEACTIVATE_FALLBACK`].
    pub fn deactivate(&self, id: SpaceId) -> Result<(), SubmitError> {
        self.service.deactivate_space(id).map_err(|err| {
            let err = SubmitError::from_service(&err, SPACE_DEACTIVATE_FALLBACK);
            if let Some(banner) = err.banner() {
                self.notifier.error(&banner);
            }
            err
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{MockNotifier, MockSpaceService, ServiceError};

    fn draft() -> SpaceDraft {
        SpaceDraft {
            name: "Lab A".into(),
            description: "Chemistry lab".into(),
            location: "Building 1".into(),
            is_active: true,
        }
    }

    #[test]
    fn test_all_fields_required() {
        let service = MockSpaceService::new();
        let notifier = MockNotifier::new();
        let form = SpaceForm::new(&service, &notifier);

        let Err(SubmitError::Validation(errors)) = form.validate(&SpaceDraft::default()) else {
            panic!("expected field errors");
        };
        assert_eq!(errors.len(), 3);
        assert_eq!(
            errors.message(Field::SpaceLocation).as_deref(),
            Some("Location is required")
        );
    }

    #[test]
    fn test_short_name() {
        let service = MockSpaceService::new();
        let notifier = MockNotifier::new();
        let form = SpaceForm::new(&service, &notifier);

        let mut input = draft();
        input.name = "A".into();
        let Err(SubmitError::Validation(errors)) = form.validate(&input) else {
            panic!("expected field errors");
        };
        assert_eq!(
            errors.message(Field::SpaceName).as_deref(),
            Some("Name must be at least 2 characters")
        );
    }

    #[test]
    fn test_edit_calls_update() {
        let mut service = MockSpaceService::new();
        service
            .expect_update_space()
            .withf(|id, request| *id == SpaceId::new(2) && request.name == "Lab A")
            .times(1)
            .returning(|id, request| {
                Ok(Space {
                    id,
                    name: request.name.clone(),
                    description: request.description.clone(),
                    location: request.location.clone(),
                    is_active: request.is_active,
                })
            });
        let notifier = MockNotifier::new();

        let mut form = SpaceForm::new(&service, &notifier).editing(SpaceId::new(2));
        let accepted = form.submit(&draft()).unwrap();
        assert_eq!(accepted.value.id, SpaceId::new(2));
        assert_eq!(form.state(), FormState::Success);
    }

    #[test]
    fn test_save_failure_fallback() {
        let mut service = MockSpaceService::new();
        service
            .expect_create_space()
            .returning(|_| Err(ServiceError::unreachable()));
        let mut notifier = MockNotifier::new();
        notifier
            .expect_error()
            .withf(|m| m == SPACE_SAVE_FALLBACK)
            .times(1)
            .returning(|_| ());

        let mut form = SpaceForm::new(&service, &notifier);
        assert!(matches!(form.submit(&draft()), Err(SubmitError::Remote(_))));
        assert_eq!(form.banner(), Some(SPACE_SAVE_FALLBACK));
    }

    #[test]
    fn test_deactivate_failure() {
        let mut service = MockSpaceService::new();
        service
            .expect_deactivate_space()
            .returning(|_| Err(ServiceError::detail(404, "Not found.")));
        let mut notifier = MockNotifier::new();
        notifier
            .expect_error()
            .withf(|m| m == "Not found.")
            .times(1)
            .returning(|_| ());

        let form = SpaceForm::new(&service, &notifier);
        assert!(form.deactivate(SpaceId::new(9)).is_err());
    }
}
