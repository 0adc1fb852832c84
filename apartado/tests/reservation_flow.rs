//! End-to-end tests of the reservation form against the in-memory backend.
//!
//! Each test drives a `ReservationForm` the way the screen would and checks
//! both what the form reports and what the backend ended up storing.

mod common;

use std::time::Duration;

use apartado::form::reservation::{RESERVATION_CREATED, RESERVATION_FALLBACK};
use apartado::{
    Calendar, DurationPolicy, Field, FieldErrorKind, FormState, InMemoryBackend, PolicyViolation,
    Redirect, ReservationDraft, ReservationForm, ReservationService, ReservationStatus, Role,
    Route, SubmitError, ViolationKind,
};
use common::{math_class, ts, Campus, RecordingNotifier};

#[test]
fn test_valid_reservation_is_created_pending() {
    let campus = Campus::new().as_teacher();
    let notifier = RecordingNotifier::default();
    let mut form = ReservationForm::new(&campus.backend, &notifier);

    let accepted = form.submit(&math_class()).unwrap();

    assert_eq!(accepted.value.status, ReservationStatus::Pending);
    assert_eq!(accepted.value.created_by, campus.teacher.id);
    assert_eq!(accepted.value.space, Some(campus.lab_a.id));
    assert_eq!(accepted.message.as_deref(), Some(RESERVATION_CREATED));
    assert_eq!(notifier.last_success().as_deref(), Some(RESERVATION_CREATED));
    assert_eq!(
        form.state(),
        FormState::Redirecting(Redirect::new(
            Route::MyReservations,
            Duration::from_millis(2000)
        ))
    );
    assert_eq!(campus.backend.reservations().len(), 1);
}

#[test]
fn test_form_walks_through_every_state() {
    let campus = Campus::new().as_teacher();
    let notifier = RecordingNotifier::default();
    let mut form = ReservationForm::new(&campus.backend, &notifier);
    form.submit(&math_class()).unwrap();

    let visited = form.machine().history().to_vec();
    assert_eq!(visited.first(), Some(&FormState::Idle));
    assert!(visited.contains(&FormState::Validating));
    assert!(visited.contains(&FormState::Submitting));
    assert!(visited.contains(&FormState::Success));
    assert!(matches!(visited.last(), Some(FormState::Redirecting(_))));
}

#[test]
fn test_field_errors_block_the_backend() {
    let campus = Campus::new().as_teacher();
    let notifier = RecordingNotifier::default();
    let mut form = ReservationForm::new(&campus.backend, &notifier);

    let draft = ReservationDraft::new("ab", "", "2025-01-02T11:00");
    let Err(SubmitError::Validation(errors)) = form.submit(&draft) else {
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
    assert_eq!(form.errors(), &errors);
    assert_eq!(form.state(), FormState::Idle);
    assert!(notifier.errors.borrow().is_empty());
    assert!(campus.backend.reservations().is_empty());
}

#[test]
fn test_duration_examples() {
    let cases = [
        ("2025-01-02T10:20", ViolationKind::TooShort),
        ("2025-01-02T15:00", ViolationKind::TooLong),
        ("2025-01-02T09:30", ViolationKind::OrderViolation),
    ];
    for (end, expected) in cases {
        let campus = Campus::new().as_teacher();
        let notifier = RecordingNotifier::default();
        let mut form = ReservationForm::new(&campus.backend, &notifier);

        let draft = ReservationDraft::new("Math Class", "2025-01-02T10:00", end);
        let err = form.submit(&draft).unwrap_err();

        assert_eq!(err.kind(), Some(expected), "end {end}");
        assert!(campus.backend.reservations().is_empty());
    }
}

#[test]
fn test_too_short_banner_text() {
    let campus = Campus::new().as_teacher();
    let notifier = RecordingNotifier::default();
    let mut form = ReservationForm::new(&campus.backend, &notifier);

    let draft = ReservationDraft::new("Math Class", "2025-01-02T10:00", "2025-01-02T10:20");
    let err = form.submit(&draft).unwrap_err();

    assert!(matches!(
        err,
        SubmitError::Policy(PolicyViolation::TooShort { minutes: 20, min: 30 })
    ));
    assert_eq!(form.banner(), Some("The minimum duration is 30 minutes."));
    assert_eq!(
        notifier.last_error().as_deref(),
        Some("The minimum duration is 30 minutes.")
    );
}

#[test]
fn test_overlap_rejected_with_backend_detail() {
    let campus = Campus::new().as_teacher();
    let notifier = RecordingNotifier::default();

    let first = math_class().with_space(campus.lab_a.id);
    ReservationForm::new(&campus.backend, &notifier)
        .submit(&first)
        .unwrap();

    let overlapping = ReservationDraft::new("Physics", "2025-01-02T10:30", "2025-01-02T11:30")
        .with_space(campus.lab_a.id);
    let mut form = ReservationForm::new(&campus.backend, &notifier);
    let err = form.submit(&overlapping).unwrap_err();

    assert_eq!(err.kind(), Some(ViolationKind::RemoteError));
    assert_eq!(
        form.banner(),
        Some("The space is already reserved for that time range.")
    );
    assert_ne!(form.banner(), Some(RESERVATION_FALLBACK));
    assert_eq!(campus.backend.reservations().len(), 1);
}

#[test]
fn test_automatic_assignment_moves_to_next_free_space() {
    let campus = Campus::new().as_teacher();
    let notifier = RecordingNotifier::default();

    let first = ReservationForm::new(&campus.backend, &notifier)
        .submit(&math_class())
        .unwrap();
    let second = ReservationForm::new(&campus.backend, &notifier)
        .submit(&math_class())
        .unwrap();

    assert_eq!(first.value.space, Some(campus.lab_a.id));
    assert_eq!(second.value.space, Some(campus.lab_b.id));
}

#[test]
fn test_cancelled_reservation_frees_the_slot() {
    let campus = Campus::new().as_teacher();
    let notifier = RecordingNotifier::default();

    let draft = math_class().with_space(campus.lab_a.id);
    let first = ReservationForm::new(&campus.backend, &notifier)
        .submit(&draft)
        .unwrap();
    campus.backend.cancel(first.value.id).unwrap();

    let again = ReservationForm::new(&campus.backend, &notifier).submit(&draft);
    assert!(again.is_ok());
}

#[test]
fn test_signed_out_submission_is_auth_error() {
    let campus = Campus::new();
    let notifier = RecordingNotifier::default();
    let mut form = ReservationForm::new(&campus.backend, &notifier);

    let err = form.submit(&math_class()).unwrap_err();
    assert_eq!(err.kind(), Some(ViolationKind::AuthError));
    assert_eq!(form.state(), FormState::Idle);
}

#[test]
fn test_start_in_the_past_is_field_error() {
    let campus = Campus::new().as_teacher();
    let notifier = RecordingNotifier::default();
    let mut form =
        ReservationForm::new(&campus.backend, &notifier).with_now(ts("2025-01-03T00:00"));

    let Err(SubmitError::Validation(errors)) = form.submit(&math_class()) else {
        panic!("expected field errors");
    };
    assert_eq!(
        errors.message(Field::StartAt).as_deref(),
        Some("Start date cannot be in the past")
    );
}

#[test]
fn test_configured_policy_applies_on_both_sides() {
    let policy = DurationPolicy::new(15, 60).unwrap();
    let backend = InMemoryBackend::new().with_policy(policy);
    let teacher = backend.register("ana@school.edu", "secret1", Role::Teacher);
    backend.sign_in_as(teacher.id);
    let notifier = RecordingNotifier::default();

    let short = ReservationDraft::new("Tutoring", "2025-01-02T10:00", "2025-01-02T10:20");
    assert!(ReservationForm::new(&backend, &notifier)
        .with_policy(policy)
        .submit(&short)
        .is_ok());

    // the default client-side policy rejects it before the backend sees it
    let err = ReservationForm::new(&backend, &notifier)
        .submit(&short)
        .unwrap_err();
    assert_eq!(err.kind(), Some(ViolationKind::TooShort));
}

#[test]
fn test_backend_policy_is_authoritative() {
    let backend = InMemoryBackend::new().with_policy(DurationPolicy::new(60, 240).unwrap());
    let teacher = backend.register("ana@school.edu", "secret1", Role::Teacher);
    backend.sign_in_as(teacher.id);
    let notifier = RecordingNotifier::default();

    let draft = ReservationDraft::new("Math Class", "2025-01-02T10:00", "2025-01-02T10:45");
    let mut form = ReservationForm::new(&backend, &notifier);
    let err = form.submit(&draft).unwrap_err();

    assert_eq!(err.kind(), Some(ViolationKind::RemoteError));
    assert_eq!(form.banner(), Some("The minimum duration is 1 hour."));
}

#[test]
fn test_calendar_seeded_backend() {
    let calendar = Calendar::from_yaml(
        r"
spaces:
  - id: 1
    name: Lab A
reservations:
  - id: 10
    space: 1
    created_by: 7
    title: Physics
    start_at: 2025-01-02T10:00:00
    end_at: 2025-01-02T11:00:00
    status: APPROVED
  - id: 11
    space: 1
    created_by: 7
    title: Chemistry
    start_at: 2025-01-02T12:00:00
    end_at: 2025-01-02T13:00:00
    status: REJECTED
",
    )
    .unwrap();
    let backend = InMemoryBackend::from_calendar(calendar);
    let teacher = backend.register("ana@school.edu", "secret1", Role::Teacher);
    backend.sign_in_as(teacher.id);
    let notifier = RecordingNotifier::default();

    let clash = ReservationDraft::new("Math", "2025-01-02T10:30", "2025-01-02T11:30");
    assert!(ReservationForm::new(&backend, &notifier).submit(&clash).is_err());

    let over_rejected = ReservationDraft::new("Math", "2025-01-02T12:00", "2025-01-02T13:00");
    let accepted = ReservationForm::new(&backend, &notifier)
        .submit(&over_rejected)
        .unwrap();
    assert_eq!(accepted.value.id.value(), 12);
    assert_ne!(teacher.id.value(), 7);
}
