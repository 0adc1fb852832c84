//! The create/edit reservation form.

use std::time::Duration;

use chrono::NaiveDateTime;

use crate::form::{Accepted, FormMachine, FormState, Redirect, Route, SubmitError};
use crate::model::{Reservation, ReservationDraft, ReservationId, ReservationRequest};
use crate::service::{Notifier, ReservationService};
use crate::validation::{
    parse_timestamp, DurationPolicy, Field, FieldContext, FieldErrors, FieldRules,
    PolicyViolation,
};

/// Banner shown when the backend gives no reason.
pub const RESERVATION_FALLBACK: &str = "Error creating reservation";
/// Success message shown before redirecting.
pub const RESERVATION_CREATED: &str = "Reservation successfully created! Redirecting...";
/// Success message of an admin edit.
pub const RESERVATION_UPDATED: &str = "Reservation successfully updated! Redirecting...";
/// Time the success message stays up before redirecting.
pub const DEFAULT_REDIRECT_DELAY: Duration = Duration::from_millis(2000);

const FIELDS: [Field; 3] = [Field::Title, Field::StartAt, Field::EndAt];

/// Orchestrates the reservation form.
///
/// Field rules run first and block submission with inline errors; the
/// duration policy runs next and blocks with a banner; only then is the
/// reservation service called, exactly once.
///
/// # Examples
///
/// ```
/// use apartado::form::{FormState, ReservationForm};
/// use apartado::model::{ReservationDraft, Role};
/// use apartado::service::{InMemoryBackend, LogNotifier};
///
/// let backend = InMemoryBackend::new();
/// let teacher = backend.register("ana@school.edu", "secret1", Role::Teacher);
/// backend.sign_in_as(teacher.id);
///
/// let mut form = ReservationForm::new(&backend, &LogNotifier);
/// let draft = ReservationDraft::new("Math Class", "2025-01-01T10:00", "2025-01-01T11:00");
/// let accepted = form.submit(&draft).unwrap();
/// assert_eq!(accepted.value.title, "Math Class");
/// assert!(matches!(form.state(), FormState::Redirecting(_)));
/// ```
pub struct ReservationForm<'a, S: ReservationService + ?Sized, N: Notifier + ?Sized> {
    service: &'a S,
    notifier: &'a N,
    rules: FieldRules,
    policy: DurationPolicy,
    redirect_delay: Duration,
    now: Option<NaiveDateTime>,
    editing: Option<ReservationId>,
    machine: FormMachine,
    errors: FieldErrors,
    banner: Option<String>,
}

impl<'a, S: ReservationService + ?Sized, N: Notifier + ?Sized> ReservationForm<'a, S, N> {
    /// A create form with default rules.
    pub fn new(service: &'a S, notifier: &'a N) -> Self {
        Self {
            service,
            notifier,
            rules: FieldRules::default(),
            policy: DurationPolicy::default(),
            redirect_delay: DEFAULT_REDIRECT_DELAY,
            now: None,
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

    /// Uses a custom duration policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: DurationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Changes the delay before redirecting.
    #[must_use]
    pub const fn with_redirect_delay(mut self, delay: Duration) -> Self {
        self.redirect_delay = delay;
        self
    }

    /// Refuses start dates before `now`.
    #[must_use]
    pub const fn with_now(mut self, now: NaiveDateTime) -> Self {
        self.now = Some(now);
        self
    }

    /// Edits an existing reservation instead of creating one (admin).
    #[must_use]
    pub const fn editing(mut self, id: ReservationId) -> Self {
        self.editing = Some(id);
        self
    }

    /// Current submission state.
    #[must_use]
    pub const fn state(&self) -> FormState {
        self.machine.state()
    }

    /// The state machine, with its history.
    #[must_use]
    pub const fn machine(&self) -> &FormMachine {
        &self.machine
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

    fn context(&self, draft: &ReservationDraft) -> FieldContext {
        let ctx = FieldContext::new().with_start_at(parse_timestamp(&draft.start_at));
        match self.now {
            Some(now) => ctx.with_now(now),
            None => ctx,
        }
    }

    /// The user typed in `field`: its error goes away.
    pub fn change(&mut self, field: Field) {
        self.errors.clear(field);
    }

    /// `field` lost focus: validate it alone and show its error, if any.
    pub fn blur(&mut self, field: Field, draft: &ReservationDraft) {
        let value = match field {
            Field::Title => &draft.title,
            Field::StartAt => &draft.start_at,
            Field::EndAt => &draft.end_at,
            _ => return,
        };
        if let Err(error) = self.rules.validate(field, value, &self.context(draft)) {
            self.errors.insert(error);
        }
    }

    /// Runs every client-side rule without submitting.
    ///
    /// # Errors
    ///
    /// [`SubmitError::Validation`] with every failing field, or
    /// [`SubmitError::Policy`] with the first broken duration rule.
    pub fn validate(&self, draft: &ReservationDraft) -> Result<ReservationRequest, SubmitError> {
        let ctx = self.context(draft);
        let errors: FieldErrors = FIELDS
            .into_iter()
            .filter_map(|field| {
                let value = match field {
                    Field::Title => &draft.title,
                    Field::StartAt => &draft.start_at,
                    _ => &draft.end_at,
                };
                self.rules.validate(field, value, &ctx).err()
            })
            .collect();
        if !errors.is_empty() {
            return Err(SubmitError::Validation(errors));
        }

        let start = parse_timestamp(&draft.start_at);
        let end = parse_timestamp(&draft.end_at);
        if let Some(violation) = self.policy.validate(start, end) {
            return Err(SubmitError::Policy(violation));
        }
        let (Some(start_at), Some(end_at)) = (start, end) else {
            return Err(SubmitError::Policy(PolicyViolation::MissingDates));
        };

        let description = draft.description.trim();
        Ok(ReservationRequest {
            title: draft.title.trim().to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            space_id: draft.space,
            start_at,
            end_at,
        })
    }

    /// Validates and, if everything passes, submits the draft.
    ///
    /// On success the form moves to `Success` then `Redirecting` towards
    /// "my reservations". On failure it returns to `Idle` with the inline
    /// errors or banner set.
    ///
    /// # Errors
    ///
    /// Every [`SubmitError`] variant; remote failures carry the backend's
    /// `detail`, else its `error`, else [`RESERVATION_FALLBACK`].
    pub fn submit(&mut self, draft: &ReservationDraft) -> Result<Accepted<Reservation>, SubmitError> {
        self.machine.begin()?;
        self.banner = None;

        let request = match self.validate(draft) {
            Ok(request) => {
                self.errors = FieldErrors::new();
                request
            }
            Err(err) => return Err(self.reject(err)),
        };

        self.machine.submitting();
        let outcome = match self.editing {
            Some(id) => self.service.update(id, &request),
            None => self.service.create(&request),
        };

        match outcome {
            Ok(reservation) => {
                let message = if self.editing.is_some() {
                    RESERVATION_UPDATED
                } else {
                    RESERVATION_CREATED
                };
                self.notifier.success(message);
                let redirect = Redirect::new(Route::MyReservations, self.redirect_delay);
                self.machine.succeed(Some(redirect));
                Ok(Accepted {
                    value: reservation,
                    message: Some(message.to_string()),
                    redirect: Some(redirect),
                })
            }
            Err(err) => Err(self.reject(SubmitError::from_service(&err, RESERVATION_FALLBACK))),
        }
    }

    fn reject(&mut self, err: SubmitError) -> SubmitError {
        match &err {
            SubmitError::Validation(errors) => self.errors = errors.clone(),
            other => {
                if let Some(banner) = other.banner() {
                    self.notifier.error(&banner);
                    self.banner = Some(banner);
                }
            }
        }
        self.machine.fail();
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ReservationStatus, SpaceId, UserId};
    use crate::service::{MockNotifier, MockReservationService, ServiceError};
    use crate::validation::FieldErrorKind;

    fn quiet_notifier() -> MockNotifier {
        let mut notifier = MockNotifier::new();
        notifier.expect_success().returning(|_| ());
        notifier.expect_error().returning(|_| ());
        notifier
    }

    fn stored(request: &ReservationRequest) -> Reservation {
        Reservation {
            id: ReservationId::new(1),
            space: request.space_id(),
            created_by: UserId::new(1),
            title: request.title().to_string(),
            description: request.description().map(str::to_string),
            start_at: request.start_at(),
            end_at: request.end_at(),
            status: ReservationStatus::Pending,
            approved_by: None,
            decision_at: None,
            decision_note: None,
        }
    }

    fn valid_draft() -> ReservationDraft {
        ReservationDraft::new("Math Class", "2025-01-01T10:00", "2025-01-01T11:00")
    }

    #[test]
    fn test_valid_request_reaches_submitting_and_calls_service_once() {
        let mut service = MockReservationService::new();
        service
            .expect_create()
            .times(1)
            .returning(|request| Ok(stored(request)));
        let mut notifier = MockNotifier::new();
        notifier
            .expect_success()
            .withf(|message| message == RESERVATION_CREATED)
            .times(1)
            .returning(|_| ());

        let mut form = ReservationForm::new(&service, &notifier);
        let accepted = form.submit(&valid_draft()).unwrap();

        assert!(form.machine().visited(FormState::Submitting));
        assert_eq!(accepted.value.title, "Math Class");
        assert_eq!(
            accepted.redirect,
            Some(Redirect::new(Route::MyReservations, DEFAULT_REDIRECT_DELAY))
        );
        assert!(matches!(form.state(), FormState::Redirecting(_)));
    }

    #[test]
    fn test_field_errors_block_the_call() {
        let mut service = MockReservationService::new();
        service.expect_create().times(0);
        let notifier = quiet_notifier();

        let mut form = ReservationForm::new(&service, &notifier);
        let draft = ReservationDraft::new("ab", "", "2025-01-01T11:00");
        let err = form.submit(&draft).unwrap_err();

        let SubmitError::Validation(errors) = err else {
            panic!("expected field errors");
        };
        assert_eq!(
            errors.get(Field::Title).map(|e| e.kind()),
            Some(FieldErrorKind::TooShort { min: 3 })
        );
        assert_eq!(
            errors.get(Field::StartAt).map(|e| e.kind()),
            Some(FieldErrorKind::RequiredField)
        );
        assert_eq!(form.errors().len(), 2);
        assert_eq!(form.state(), FormState::Idle);
        assert!(!form.machine().visited(FormState::Submitting));
    }

    #[test]
    fn test_end_before_start_is_a_field_error() {
        let service = MockReservationService::new();
        let notifier = quiet_notifier();
        let form = ReservationForm::new(&service, &notifier);

        let draft = ReservationDraft::new("Math Class", "2025-01-01T10:00", "2025-01-01T09:30");
        let Err(SubmitError::Validation(errors)) = form.validate(&draft) else {
            panic!("expected field errors");
        };
        assert_eq!(
            errors.message(Field::EndAt).as_deref(),
            Some("End date must be after start date")
        );
    }

    #[test]
    fn test_policy_blocks_with_banner() {
        let mut service = MockReservationService::new();
        service.expect_create().times(0);
        let mut notifier = MockNotifier::new();
        notifier
            .expect_error()
            .withf(|message| message == "The minimum duration is 30 minutes.")
            .times(1)
            .returning(|_| ());

        let mut form = ReservationForm::new(&service, &notifier);
        let draft = ReservationDraft::new("Math Class", "2025-01-01T10:00", "2025-01-01T10:20");
        let err = form.submit(&draft).unwrap_err();

        assert!(matches!(
            err,
            SubmitError::Policy(PolicyViolation::TooShort { minutes: 20, .. })
        ));
        assert_eq!(form.banner(), Some("The minimum duration is 30 minutes."));
        assert!(form.errors().is_empty());
    }

    #[test]
    fn test_too_long_blocks() {
        let service = MockReservationService::new();
        let notifier = quiet_notifier();
        let form = ReservationForm::new(&service, &notifier);
        let draft = ReservationDraft::new("Math Class", "2025-01-01T10:00", "2025-01-01T15:00");
        assert!(matches!(
            form.validate(&draft),
            Err(SubmitError::Policy(PolicyViolation::TooLong { minutes: 300, .. }))
        ));
    }

    #[test]
    fn test_remote_detail_surfaces_verbatim() {
        let mut service = MockReservationService::new();
        service
            .expect_create()
            .times(1)
            .returning(|_| Err(ServiceError::detail(400, "Space is not available")));
        let notifier = quiet_notifier();

        let mut form = ReservationForm::new(&service, &notifier);
        let err = form.submit(&valid_draft()).unwrap_err();

        assert!(matches!(err, SubmitError::Remote(_)));
        assert_eq!(form.banner(), Some("Space is not available"));
        assert_eq!(form.state(), FormState::Idle);
    }

    #[test]
    fn test_remote_without_payload_uses_fallback() {
        let mut service = MockReservationService::new();
        service
            .expect_create()
            .returning(|_| Err(ServiceError::unreachable()));
        let notifier = quiet_notifier();

        let mut form = ReservationForm::new(&service, &notifier);
        form.submit(&valid_draft()).unwrap_err();
        assert_eq!(form.banner(), Some(RESERVATION_FALLBACK));
    }

    #[test]
    fn test_expired_session_is_auth_error() {
        let mut service = MockReservationService::new();
        service
            .expect_create()
            .returning(|_| Err(ServiceError::detail(401, "Token expired")));
        let notifier = quiet_notifier();

        let mut form = ReservationForm::new(&service, &notifier);
        assert!(matches!(
            form.submit(&valid_draft()),
            Err(SubmitError::Auth(_))
        ));
    }

    #[test]
    fn test_editing_calls_update() {
        let mut service = MockReservationService::new();
        service.expect_create().times(0);
        service
            .expect_update()
            .withf(|id, _| *id == ReservationId::new(7))
            .times(1)
            .returning(|_, request| Ok(stored(request)));
        let notifier = quiet_notifier();

        let mut form = ReservationForm::new(&service, &notifier).editing(ReservationId::new(7));
        let accepted = form.submit(&valid_draft()).unwrap();
        assert_eq!(accepted.message.as_deref(), Some(RESERVATION_UPDATED));
    }

    #[test]
    fn test_request_shape() {
        let service = MockReservationService::new();
        let notifier = quiet_notifier();
        let form = ReservationForm::new(&service, &notifier);

        let draft = ReservationDraft::new("  Math Class ", "2025-01-01T10:00", "2025-01-01T11:00")
            .with_description("   ")
            .with_space(SpaceId::new(3));
        let request = form.validate(&draft).unwrap();
        assert_eq!(request.title(), "Math Class");
        assert_eq!(request.description(), None);
        assert_eq!(request.space_id(), Some(SpaceId::new(3)));
        assert_eq!(request.duration_minutes(), 60);
    }

    #[test]
    fn test_start_in_the_past() {
        let service = MockReservationService::new();
        let notifier = quiet_notifier();
        let now = parse_timestamp("2025-06-01T00:00").unwrap();
        let form = ReservationForm::new(&service, &notifier).with_now(now);

        let Err(SubmitError::Validation(errors)) = form.validate(&valid_draft()) else {
            panic!("expected field errors");
        };
        assert_eq!(
            errors.message(Field::StartAt).as_deref(),
            Some("Start date cannot be in the past")
        );
    }

    #[test]
    fn test_blur_and_change() {
        let service = MockReservationService::new();
        let notifier = quiet_notifier();
        let mut form = ReservationForm::new(&service, &notifier);

        let draft = ReservationDraft::default();
        form.blur(Field::Title, &draft);
        form.blur(Field::Email, &draft);
        assert_eq!(form.errors().len(), 1);
        form.change(Field::Title);
        assert!(form.errors().is_empty());
    }

    #[test]
    fn test_busy_while_submitting() {
        let service = MockReservationService::new();
        let notifier = quiet_notifier();
        let mut form = ReservationForm::new(&service, &notifier);
        form.machine.begin().unwrap();
        form.machine.submitting();

        assert!(matches!(form.submit(&valid_draft()), Err(SubmitError::Busy)));
    }

    #[test]
    fn test_custom_policy() {
        let mut service = MockReservationService::new();
        service.expect_create().times(0);
        let notifier = quiet_notifier();
        let policy = DurationPolicy::new(60, 120).unwrap();
        let form = ReservationForm::new(&service, &notifier).with_policy(policy);

        let draft = ReservationDraft::new("Math Class", "2025-01-01T10:00", "2025-01-01T10:45");
        assert!(matches!(
            form.validate(&draft),
            Err(SubmitError::Policy(PolicyViolation::TooShort { min: 60, .. }))
        ));
    }
}
