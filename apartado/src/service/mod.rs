//! Collaborators the form orchestrators talk to.
//!
//! The traits mirror the backend's REST resources. Every call is synchronous
//! and runs to completion; failures carry the backend's status code and its
//! `{ detail?, error? }` payload untouched, so the forms can pick the message
//! to show.
//!
//! [`InMemoryBackend`] implements all of them over plain in-memory state and
//! enforces the authoritative rules (slot overlap, status transitions,
//! roles). It is what the CLI and the integration tests submit to.

pub mod memory;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{
    Credentials, DateWindow, Reservation, ReservationDecision, ReservationId, ReservationRequest, Space,
    SpaceId, SpaceRequest, StatusFilter, User, UserId, UserRequest,
};

pub use memory::{Calendar, InMemoryBackend};

/// Status code of an unauthenticated request.
pub const STATUS_UNAUTHORIZED: u16 = 401;
/// Status code of a request refused for the caller's role.
pub const STATUS_FORBIDDEN: u16 = 403;

/// Body of a failed backend response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    /// Human-readable reason, preferred when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Secondary error string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorPayload {
    /// `detail` if present and non-blank, otherwise `error`.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        [self.detail.as_deref(), self.error.as_deref()]
            .into_iter()
            .flatten()
            .find(|m| !m.trim().is_empty())
    }
}

/// A failed collaborator call.
///
/// `status` is `None` when the backend never answered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", self.payload.message().unwrap_or("the request failed"))]
pub struct ServiceError {
    /// Response status code, if any.
    pub status: Option<u16>,
    /// Response body.
    pub payload: ErrorPayload,
}

impl ServiceError {
    /// An answered failure with a `detail` message.
    #[must_use]
    pub fn detail(status: u16, detail: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            payload: ErrorPayload {
                detail: Some(detail.into()),
                error: None,
            },
        }
    }

    /// A failure with no response at all.
    #[must_use]
    pub fn unreachable() -> Self {
        Self {
            status: None,
            payload: ErrorPayload::default(),
        }
    }

    /// Whether the backend refused the caller's credentials.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status == Some(STATUS_UNAUTHORIZED)
    }
}

/// Identity of the signed-in user.
pub trait AuthContext {
    /// The signed-in user, if any.
    fn current_user(&self) -> Option<User>;

    /// Whether the signed-in user holds the admin role.
    fn is_admin(&self) -> bool {
        self.current_user().is_some_and(|user| user.is_admin())
    }
}

/// A fixed identity, for callers that already know who is signed in.
#[derive(Debug, Clone, Default)]
pub struct Session {
    user: Option<User>,
}

impl Session {
    /// A session for `user`.
    #[must_use]
    pub const fn signed_in(user: User) -> Self {
        Self { user: Some(user) }
    }

    /// A session with nobody signed in.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { user: None }
    }
}

impl AuthContext for Session {
    fn current_user(&self) -> Option<User> {
        self.user.clone()
    }
}

/// Credential check.
#[cfg_attr(test, mockall::automock)]
pub trait AuthService {
    /// Signs in and returns the account.
    ///
    /// # Errors
    ///
    /// A 401 failure for unknown or inactive accounts.
    fn login(&self, credentials: &Credentials) -> Result<User, ServiceError>;

    /// Ends the current session.
    fn logout(&self);
}

/// Bookable spaces.
#[cfg_attr(test, mockall::automock)]
pub trait SpaceService {
    /// Every space, active or not.
    ///
    /// # Errors
    ///
    /// Any backend failure.
    fn list_spaces(&self) -> Result<Vec<Space>, ServiceError>;

    /// Creates a space (admin).
    ///
    /// # Errors
    ///
    /// Any backend failure; 403 for non-admins.
    fn create_space(&self, request: &SpaceRequest) -> Result<Space, ServiceError>;

    /// Replaces a space's fields (admin).
    ///
    /// # Errors
    ///
    /// Any backend failure; 403 for non-admins, 404 for unknown ids.
    fn update_space(&self, id: SpaceId, request: &SpaceRequest) -> Result<Space, ServiceError>;

    /// Hides a space from selection (admin).
    ///
    /// # Errors
    ///
    /// Any backend failure; 403 for non-admins, 404 for unknown ids.
    fn deactivate_space(&self, id: SpaceId) -> Result<(), ServiceError>;
}

/// Spaces offered in the reservation form's selection control.
///
/// # Errors
///
/// Propagates the listing failure.
pub fn active_spaces<S: SpaceService + ?Sized>(spaces: &S) -> Result<Vec<Space>, ServiceError> {
    Ok(spaces
        .list_spaces()?
        .into_iter()
        .filter(|space| space.is_active)
        .collect())
}

/// Reservations of the signed-in user and, for admins, everybody's.
#[cfg_attr(test, mockall::automock)]
pub trait ReservationService {
    /// Creates a pending reservation owned by the caller.
    ///
    /// # Errors
    ///
    /// 400 when the slot is taken or the interval is refused.
    fn create(&self, request: &ReservationRequest) -> Result<Reservation, ServiceError>;

    /// Replaces a reservation's fields (admin).
    ///
    /// # Errors
    ///
    /// 403 for non-admins, 404 for unknown ids, 400 on overlap.
    fn update(
        &self,
        id: ReservationId,
        request: &ReservationRequest,
    ) -> Result<Reservation, ServiceError>;

    /// Reservations created by the caller that overlap `window`.
    ///
    /// # Errors
    ///
    /// 401 without a session, 400 when the window's start is not before its
    /// end.
    fn list_mine(&self, window: DateWindow) -> Result<Vec<Reservation>, ServiceError>;

    /// Reservations visible to the caller that pass `filter` and overlap
    /// `window`.
    ///
    /// Non-admins only ever see pending and approved reservations.
    ///
    /// # Errors
    ///
    /// 401 without a session, 400 for a reversed window.
    fn list_all(
        &self,
        filter: StatusFilter,
        window: DateWindow,
    ) -> Result<Vec<Reservation>, ServiceError>;

    /// Cancels a pending or approved reservation (owner or admin).
    ///
    /// # Errors
    ///
    /// 403 for other users, 400 for reservations that cannot be cancelled.
    fn cancel(&self, id: ReservationId) -> Result<Reservation, ServiceError>;

    /// Approves or rejects a pending reservation (admin).
    ///
    /// # Errors
    ///
    /// 403 for non-admins, 400 for reservations that are not pending.
    fn decide(&self, decision: &ReservationDecision) -> Result<Reservation, ServiceError>;
}

/// User administration.
#[cfg_attr(test, mockall::automock)]
pub trait UserService {
    /// Every account (admin).
    ///
    /// # Errors
    ///
    /// 403 for non-admins.
    fn list_users(&self) -> Result<Vec<User>, ServiceError>;

    /// Creates an account (admin).
    ///
    /// # Errors
    ///
    /// 403 for non-admins, 400 for a taken e-mail.
    fn create_user(&self, request: &UserRequest) -> Result<User, ServiceError>;

    /// Replaces an account's fields; a `None` password keeps the old one.
    ///
    /// # Errors
    ///
    /// 403 for non-admins, 404 for unknown ids, 400 for a taken e-mail.
    fn update_user(&self, id: UserId, request: &UserRequest) -> Result<User, ServiceError>;

    /// Deactivates an account (admin).
    ///
    /// # Errors
    ///
    /// 403 for non-admins, 404 for unknown ids.
    fn deactivate_user(&self, id: UserId) -> Result<(), ServiceError>;
}

/// Receives the success and error strings shown to the user.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier {
    /// A success message.
    fn success(&self, message: &str);
    /// An error message.
    fn error(&self, message: &str);
}

/// Forwards notifications to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn success(&self, message: &str) {
        log::info!("{message}");
    }

    fn error(&self, message: &str) {
        log::warn!("{message}");
    }
}
