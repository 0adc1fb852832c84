//! Admin decisions and cancellations.

use crate::form::{Accepted, FormMachine, FormState, RemoteFailure, SubmitError};
use crate::model::{DecisionType, Reservation, ReservationDecision, ReservationId};
use crate::service::{AuthContext, Notifier, ReservationService, STATUS_FORBIDDEN};

/// Banner shown when a decision fails without a reason.
pub const DECISION_FALLBACK: &str = "Error processing the decision";
/// Banner shown when a cancellation fails without a reason.
pub const CANCEL_FALLBACK: &str = "Error cancelling the reservation";
/// Banner shown to non-admins trying to decide.
pub const ADMIN_REQUIRED: &str = "Only administrators can approve or reject reservations";

/// Approves or rejects pending reservations.
///
/// The caller's role is checked before the backend is contacted.
pub struct DecisionForm<'a, S, A, N>
where
    S: ReservationService + ?Sized,
    A: AuthContext + ?Sized,
    N: Notifier + ?Sized,
{
    service: &'a S,
    auth: &'a A,
    notifier: &'a N,
    machine: FormMachine,
}

impl<'a, S, A, N> DecisionForm<'a, S, A, N>
where
    S: ReservationService + ?Sized,
    A: AuthContext + ?Sized,
    N: Notifier + ?Sized,
{
    /// A decision dialog for the signed-in user of `auth`.
    pub fn new(service: &'a S, auth: &'a A, notifier: &'a N) -> Self {
        Self {
            service,
            auth,
            notifier,
            machine: FormMachine::new(),
        }
    }

    /// Current submission state.
    #[must_use]
    pub const fn state(&self) -> FormState {
        self.machine.state()
    }

    /// Approves reservation `id`.
    ///
    /// # Errors
    ///
    /// See [`decide`](Self::decide).
    pub fn approve(
        &mut self,
        id: ReservationId,
        note: Option<String>,
    ) -> Result<Accepted<Reservation>, SubmitError> {
        self.decide(&ReservationDecision::new(id, DecisionType::Approve, note))
    }

    /// Rejects reservation `id`.
    ///
    /// # Errors
    ///
    /// See [`decide`](Self::decide).
    pub fn reject(
        &mut self,
        id: ReservationId,
        note: Option<String>,
    ) -> Result<Accepted<Reservation>, SubmitError> {
        self.decide(&ReservationDecision::new(id, DecisionType::Reject, note))
    }

    /// Sends a decision.
    ///
    /// # Errors
    ///
    /// [`SubmitError::Auth`] if the caller is not an admin, otherwise the
    /// backend's reason with [`DECISION_FALLBACK`].
    pub fn decide(
        &mut self,
        decision: &ReservationDecision,
    ) -> Result<Accepted<Reservation>, SubmitError> {
        self.machine.begin()?;
        if !self.auth.is_admin() {
            let err = SubmitError::Auth(RemoteFailure {
                status: Some(STATUS_FORBIDDEN),
                message: ADMIN_REQUIRED.to_string(),
            });
            self.notifier.error(ADMIN_REQUIRED);
            self.machine.fail();
            return Err(err);
        }

        self.machine.submitting();
        match self.service.decide(decision) {
            Ok(reservation) => {
                self.machine.succeed(None);
                Ok(Accepted {
                    value: reservation,
                    message: None,
                    redirect: None,
                })
            }
            Err(err) => {
                let err = SubmitError::from_service(&err, DECISION_FALLBACK);
                if let Some(banner) = err.banner() {
                    self.notifier.error(&banner);
                }
                self.machine.fail();
                Err(err)
            }
        }
    }
}

/// Cancels reservations on behalf of their owner or an admin.
pub struct Cancellation<'a, S, A, N>
where
    S: ReservationService + ?Sized,
    A: AuthContext + ?Sized,
    N: Notifier + ?Sized,
{
    service: &'a S,
    auth: &'a A,
    notifier: &'a N,
}

impl<'a, S, A, N> Cancellation<'a, S, A, N>
where
    S: ReservationService + ?Sized,
    A: AuthContext + ?Sized,
    N: Notifier + ?Sized,
{
    /// Cancellation for the signed-in user of `auth`.
    pub const fn new(service: &'a S, auth: &'a A, notifier: &'a N) -> Self {
        Self {
            service,
            auth,
            notifier,
        }
    }

    /// Whether the cancel action should be offered for `reservation`.
    #[must_use]
    pub fn can_cancel(&self, reservation: &Reservation) -> bool {
        reservation.status.is_cancellable()
            && self
                .auth
                .current_user()
                .is_some_and(|user| user.is_admin() || user.id == reservation.created_by)
    }

    /// Cancels reservation `id`.
    ///
    /// # Errors
    ///
    /// The backend's reason with [`CANCEL_FALLBACK`].
    pub fn cancel(&self, id: ReservationId) -> Result<Reservation, SubmitError> {
        self.service.cancel(id).map_err(|err| {
            let err = SubmitError::from_service(&err, CANCEL_FALLBACK);
            if let Some(banner) = err.banner() {
                self.notifier.error(&banner);
            }
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ReservationStatus, Role, User, UserId};
    use crate::service::{MockNotifier, MockReservationService, ServiceError, Session};
    use crate::validation::parse_timestamp;

    fn person(id: u64, role: Role) -> User {
        User {
            id: UserId::new(id),
            email: format!("user{id}@school.edu"),
            first_name: "Test".into(),
            last_name: "User".into(),
            role,
            is_active: true,
        }
    }

    fn reservation(owner: u64, status: ReservationStatus) -> Reservation {
        Reservation {
            id: ReservationId::new(3),
            space: None,
            created_by: UserId::new(owner),
            title: "Math Class".into(),
            description: None,
            start_at: parse_timestamp("2025-01-01T10:00").unwrap(),
            end_at: parse_timestamp("2025-01-01T11:00").unwrap(),
            status,
            approved_by: None,
            decision_at: None,
            decision_note: None,
        }
    }

    #[test]
    fn test_non_admin_cannot_decide() {
        let mut service = MockReservationService::new();
        service.expect_decide().times(0);
        let mut notifier = MockNotifier::new();
        notifier
            .expect_error()
            .withf(|m| m == ADMIN_REQUIRED)
            .times(1)
            .returning(|_| ());
        let auth = Session::signed_in(person(2, Role::Teacher));

        let mut form = DecisionForm::new(&service, &auth, &notifier);
        let err = form.approve(ReservationId::new(3), None).unwrap_err();
        assert!(matches!(err, SubmitError::Auth(_)));
        assert_eq!(form.state(), FormState::Idle);
    }

    #[test]
    fn test_admin_rejects_with_note() {
        let mut service = MockReservationService::new();
        service
            .expect_decide()
            .withf(|d| d.decision == DecisionType::Reject && d.note.as_deref() == Some("Busy day"))
            .times(1)
            .returning(|d| {
                let mut r = reservation(2, ReservationStatus::Pending);
                r.status = d.decision.resulting_status();
                r.decision_note.clone_from(&d.note);
                Ok(r)
            });
        let notifier = MockNotifier::new();
        let auth = Session::signed_in(person(1, Role::Admin));

        let mut form = DecisionForm::new(&service, &auth, &notifier);
        let accepted = form
            .reject(ReservationId::new(3), Some("  Busy day ".into()))
            .unwrap();
        assert_eq!(accepted.value.status, ReservationStatus::Rejected);
        assert_eq!(form.state(), FormState::Success);
    }

    #[test]
    fn test_decision_failure_surfaces_detail() {
        let mut service = MockReservationService::new();
        service.expect_decide().returning(|_| {
            Err(ServiceError::detail(
                400,
                "Only pending reservations can be approved or rejected.",
            ))
        });
        let mut notifier = MockNotifier::new();
        notifier.expect_error().times(1).returning(|_| ());
        let auth = Session::signed_in(person(1, Role::Admin));

        let mut form = DecisionForm::new(&service, &auth, &notifier);
        let err = form.approve(ReservationId::new(3), None).unwrap_err();
        assert_eq!(
            err.banner().as_deref(),
            Some("Only pending reservations can be approved or rejected.")
        );
    }

    #[test]
    fn test_can_cancel_owner_or_admin() {
        let service = MockReservationService::new();
        let notifier = MockNotifier::new();

        let owner = Session::signed_in(person(2, Role::Teacher));
        let other = Session::signed_in(person(5, Role::Teacher));
        let admin = Session::signed_in(person(1, Role::Admin));

        let pending = reservation(2, ReservationStatus::Pending);
        let rejected = reservation(2, ReservationStatus::Rejected);

        assert!(Cancellation::new(&service, &owner, &notifier).can_cancel(&pending));
        assert!(Cancellation::new(&service, &admin, &notifier).can_cancel(&pending));
        assert!(!Cancellation::new(&service, &other, &notifier).can_cancel(&pending));
        assert!(!Cancellation::new(&service, &owner, &notifier).can_cancel(&rejected));
        assert!(!Cancellation::new(&service, &Session::anonymous(), &notifier).can_cancel(&pending));
    }

    #[test]
    fn test_cancel_failure_fallback() {
        let mut service = MockReservationService::new();
        service
            .expect_cancel()
            .returning(|_| Err(ServiceError::unreachable()));
        let mut notifier = MockNotifier::new();
        notifier
            .expect_error()
            .withf(|m| m == CANCEL_FALLBACK)
            .times(1)
            .returning(|_| ());
        let auth = Session::signed_in(person(2, Role::Teacher));

        let cancellation = Cancellation::new(&service, &auth, &notifier);
        assert!(cancellation.cancel(ReservationId::new(3)).is_err());
    }
}
