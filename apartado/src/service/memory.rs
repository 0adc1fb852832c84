//! In-memory reference backend.
//!
//! Holds users, spaces and reservations in a `RefCell` and applies the rules
//! the backend of record applies: a reservation may not overlap a pending or
//! approved reservation of the same space, only pending reservations can be
//! decided, only the owner or an admin can cancel, and admin-only resources
//! answer 403 to everybody else. Nothing is persisted.

use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::Path;

use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{
    Credentials, DateWindow, Reservation, ReservationDecision, ReservationId,
    ReservationRequest, ReservationStatus, Role, Space, SpaceId, SpaceRequest, StatusFilter, User,
    UserId, UserRequest,
};
use crate::service::{
    AuthContext, AuthService, ReservationService, ServiceError, SpaceService, UserService,
    STATUS_FORBIDDEN, STATUS_UNAUTHORIZED,
};
use crate::validation::{overlaps, DurationPolicy};

const NOT_AUTHENTICATED: &str = "Authentication credentials were not provided.";
const BAD_CREDENTIALS: &str = "No active account found with the given credentials";
const FORBIDDEN: &str = "You do not have permission to perform this action.";
const NOT_FOUND: &str = "Not found.";
const SLOT_TAKEN: &str = "The space is already reserved for that time range.";
const NO_FREE_SPACE: &str = "No space is available for that time range.";
const SPACE_UNAVAILABLE: &str = "The selected space is not available.";
const NOT_DECIDABLE: &str = "Only pending reservations can be approved or rejected.";
const NOT_CANCELLABLE: &str = "Only pending or approved reservations can be cancelled.";
const EDIT_ADMIN_ONLY: &str = "Only admins can edit reservations";
const EMAIL_TAKEN: &str = "A user with that email already exists.";
const PASSWORD_REQUIRED: &str = "A password is required for new users.";
const REVERSED_WINDOW: &str = "The start date must be before the end date.";

const STATUS_BAD_REQUEST: u16 = 400;
const STATUS_NOT_FOUND: u16 = 404;

/// Spaces and existing reservations to seed a backend with.
///
/// # Examples
///
/// ```
/// use apartado::service::Calendar;
///
/// let calendar = Calendar::from_yaml(
///     r#"
/// spaces:
///   - id: 1
///     name: Lab A
/// reservations:
///   - id: 10
///     space: 1
///     created_by: 7
///     title: Physics
///     start_at: 2025-01-01T10:00:00
///     end_at: 2025-01-01T11:00:00
///     status: APPROVED
/// "#,
/// )
/// .unwrap();
/// assert_eq!(calendar.spaces.len(), 1);
/// assert_eq!(calendar.reservations.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Calendar {
    /// Known spaces.
    #[serde(default)]
    pub spaces: Vec<Space>,
    /// Reservations already on record.
    #[serde(default)]
    pub reservations: Vec<Reservation>,
}

impl Calendar {
    /// Parses a calendar from YAML.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for malformed YAML or unknown fields.
    pub fn from_yaml(contents: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Reads a calendar file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, or a configuration
    /// error if it does not parse.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            Error::Io(io::Error::new(
                e.kind(),
                format!("cannot read calendar {}: {e}", path.display()),
            ))
        })?;
        Self::from_yaml(&contents)
    }
}

#[derive(Debug)]
struct Account {
    user: User,
    password: String,
}

#[derive(Debug, Default)]
struct State {
    accounts: Vec<Account>,
    spaces: Vec<Space>,
    reservations: Vec<Reservation>,
    session: Option<UserId>,
    next_user: u64,
    next_space: u64,
    next_reservation: u64,
}

impl State {
    fn current(&self) -> Option<&User> {
        let id = self.session?;
        self.accounts
            .iter()
            .map(|a| &a.user)
            .find(|u| u.id == id && u.is_active)
    }

    fn require_user(&self) -> std::result::Result<User, ServiceError> {
        self.current()
            .cloned()
            .ok_or_else(|| ServiceError::detail(STATUS_UNAUTHORIZED, NOT_AUTHENTICATED))
    }

    fn require_admin(&self) -> std::result::Result<User, ServiceError> {
        let user = self.require_user()?;
        if user.is_admin() {
            Ok(user)
        } else {
            Err(ServiceError::detail(STATUS_FORBIDDEN, FORBIDDEN))
        }
    }

    fn slot_taken(
        &self,
        space: SpaceId,
        start: NaiveDateTime,
        end: NaiveDateTime,
        exclude: Option<ReservationId>,
    ) -> bool {
        self.reservations
            .iter()
            .filter(|r| Some(r.id) != exclude)
            .any(|r| r.conflicts_with(space, start, end))
    }

    /// Resolves the space of a request: the named one if it is free, or the
    /// first free active space. Unassigned when no active space exists.
    fn assign_space(
        &self,
        requested: Option<SpaceId>,
        start: NaiveDateTime,
        end: NaiveDateTime,
        exclude: Option<ReservationId>,
    ) -> std::result::Result<Option<SpaceId>, ServiceError> {
        if let Some(id) = requested {
            if !self.spaces.iter().any(|s| s.id == id && s.is_active) {
                return Err(ServiceError::detail(STATUS_BAD_REQUEST, SPACE_UNAVAILABLE));
            }
            if self.slot_taken(id, start, end, exclude) {
                return Err(ServiceError::detail(STATUS_BAD_REQUEST, SLOT_TAKEN));
            }
            return Ok(Some(id));
        }

        let mut active = self.spaces.iter().filter(|s| s.is_active).peekable();
        if active.peek().is_none() {
            return Ok(None);
        }
        active
            .find(|s| !self.slot_taken(s.id, start, end, exclude))
            .map(|s| Some(s.id))
            .ok_or_else(|| ServiceError::detail(STATUS_BAD_REQUEST, NO_FREE_SPACE))
    }

    fn reservation_mut(
        &mut self,
        id: ReservationId,
    ) -> std::result::Result<&mut Reservation, ServiceError> {
        self.reservations
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| ServiceError::detail(STATUS_NOT_FOUND, NOT_FOUND))
    }

    fn email_taken(&self, email: &str, exclude: Option<UserId>) -> bool {
        self.accounts
            .iter()
            .filter(|a| Some(a.user.id) != exclude)
            .any(|a| a.user.email.eq_ignore_ascii_case(email))
    }
}

fn next_id(counter: &mut u64) -> u64 {
    *counter += 1;
    *counter
}

/// A backend kept entirely in memory.
///
/// # Examples
///
/// ```
/// use apartado::model::Role;
/// use apartado::service::{AuthContext, InMemoryBackend};
///
/// let backend = InMemoryBackend::new();
/// let admin = backend.register("admin@school.edu", "secret1", Role::Admin);
/// backend.sign_in_as(admin.id);
/// assert!(backend.is_admin());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    state: RefCell<State>,
    policy: DurationPolicy,
    clock: Option<NaiveDateTime>,
}

impl InMemoryBackend {
    /// An empty backend with the default duration policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend seeded with a calendar's spaces and reservations.
    #[must_use]
    pub fn from_calendar(calendar: Calendar) -> Self {
        let backend = Self::new();
        {
            let mut state = backend.state.borrow_mut();
            state.next_space = calendar.spaces.iter().map(|s| s.id.value()).max().unwrap_or(0);
            state.next_reservation = calendar
                .reservations
                .iter()
                .map(|r| r.id.value())
                .max()
                .unwrap_or(0);
            state.next_user = calendar
                .reservations
                .iter()
                .map(|r| r.created_by.value())
                .max()
                .unwrap_or(0);
            state.spaces = calendar.spaces;
            state.reservations = calendar.reservations;
        }
        backend
    }

    /// Uses `policy` for the server-side duration check.
    #[must_use]
    pub const fn with_policy(mut self, policy: DurationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Freezes the clock used for decision timestamps.
    #[must_use]
    pub const fn with_clock(mut self, now: NaiveDateTime) -> Self {
        self.clock = Some(now);
        self
    }

    fn now(&self) -> NaiveDateTime {
        self.clock.unwrap_or_else(|| Utc::now().naive_utc())
    }

    fn listing_range(
        &self,
        window: DateWindow,
    ) -> std::result::Result<(NaiveDateTime, NaiveDateTime), ServiceError> {
        window
            .resolve(self.now())
            .map_err(|_| ServiceError::detail(STATUS_BAD_REQUEST, REVERSED_WINDOW))
    }

    /// Adds an active account without any permission check.
    pub fn register(&self, email: &str, password: &str, role: Role) -> User {
        let mut state = self.state.borrow_mut();
        let id = UserId::new(next_id(&mut state.next_user));
        let local = email.split('@').next().unwrap_or(email);
        let (first_name, last_name) = local.split_once('.').unwrap_or((local, ""));
        let user = User {
            id,
            email: email.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            role,
            is_active: true,
        };
        state.accounts.push(Account {
            user: user.clone(),
            password: password.to_string(),
        });
        user
    }

    /// Adds a space without any permission check.
    pub fn add_space(&self, name: &str, location: &str) -> Space {
        let mut state = self.state.borrow_mut();
        let space = Space {
            id: SpaceId::new(next_id(&mut state.next_space)),
            name: name.to_string(),
            description: String::new(),
            location: location.to_string(),
            is_active: true,
        };
        state.spaces.push(space.clone());
        space
    }

    /// Opens a session for `id` without checking a password.
    pub fn sign_in_as(&self, id: UserId) {
        self.state.borrow_mut().session = Some(id);
    }

    /// Every reservation on record, regardless of the session.
    #[must_use]
    pub fn reservations(&self) -> Vec<Reservation> {
        self.state.borrow().reservations.clone()
    }
}

impl AuthContext for InMemoryBackend {
    fn current_user(&self) -> Option<User> {
        self.state.borrow().current().cloned()
    }
}

impl AuthService for InMemoryBackend {
    fn login(&self, credentials: &Credentials) -> std::result::Result<User, ServiceError> {
        let mut state = self.state.borrow_mut();
        let user = state
            .accounts
            .iter()
            .find(|a| {
                a.user.is_active
                    && a.user.email.eq_ignore_ascii_case(credentials.email.trim())
                    && a.password == credentials.password
            })
            .map(|a| a.user.clone())
            .ok_or_else(|| ServiceError::detail(STATUS_UNAUTHORIZED, BAD_CREDENTIALS))?;
        state.session = Some(user.id);
        log::debug!("signed in {}", user.email);
        Ok(user)
    }

    fn logout(&self) {
        self.state.borrow_mut().session = None;
    }
}

impl SpaceService for InMemoryBackend {
    fn list_spaces(&self) -> std::result::Result<Vec<Space>, ServiceError> {
        let state = self.state.borrow();
        state.require_user()?;
        Ok(state.spaces.clone())
    }

    fn create_space(&self, request: &SpaceRequest) -> std::result::Result<Space, ServiceError> {
        let mut state = self.state.borrow_mut();
        state.require_admin()?;
        let space = Space {
            id: SpaceId::new(next_id(&mut state.next_space)),
            name: request.name.clone(),
            description: request.description.clone(),
            location: request.location.clone(),
            is_active: request.is_active,
        };
        state.spaces.push(space.clone());
        Ok(space)
    }

    fn update_space(
        &self,
        id: SpaceId,
        request: &SpaceRequest,
    ) -> std::result::Result<Space, ServiceError> {
        let mut state = self.state.borrow_mut();
        state.require_admin()?;
        let space = state
            .spaces
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| ServiceError::detail(STATUS_NOT_FOUND, NOT_FOUND))?;
        space.name.clone_from(&request.name);
        space.description.clone_from(&request.description);
        space.location.clone_from(&request.location);
        space.is_active = request.is_active;
        Ok(space.clone())
    }

    fn deactivate_space(&self, id: SpaceId) -> std::result::Result<(), ServiceError> {
        let mut state = self.state.borrow_mut();
        state.require_admin()?;
        let space = state
            .spaces
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| ServiceError::detail(STATUS_NOT_FOUND, NOT_FOUND))?;
        space.is_active = false;
        Ok(())
    }
}

impl ReservationService for InMemoryBackend {
    fn create(&self, request: &ReservationRequest) -> std::result::Result<Reservation, ServiceError> {
        let mut state = self.state.borrow_mut();
        let user = state.require_user()?;
        let (start, end) = (request.start_at(), request.end_at());
        if let Some(violation) = self.policy.validate(Some(start), Some(end)) {
            return Err(ServiceError::detail(STATUS_BAD_REQUEST, violation.to_string()));
        }
        let space = state.assign_space(request.space_id(), start, end, None)?;

        let reservation = Reservation {
            id: ReservationId::new(next_id(&mut state.next_reservation)),
            space,
            created_by: user.id,
            title: request.title().to_string(),
            description: request.description().map(str::to_string),
            start_at: start,
            end_at: end,
            status: ReservationStatus::Pending,
            approved_by: None,
            decision_at: None,
            decision_note: None,
        };
        log::debug!(
            "created reservation {} for {} ({} minutes)",
            reservation.id,
            user.email,
            request.duration_minutes()
        );
        state.reservations.push(reservation.clone());
        Ok(reservation)
    }

    fn update(
        &self,
        id: ReservationId,
        request: &ReservationRequest,
    ) -> std::result::Result<Reservation, ServiceError> {
        let mut state = self.state.borrow_mut();
        let user = state.require_user()?;
        if !user.is_admin() {
            return Err(ServiceError::detail(STATUS_FORBIDDEN, EDIT_ADMIN_ONLY));
        }
        let current = state.reservation_mut(id)?.clone();
        let (start, end) = (request.start_at(), request.end_at());
        let requested_space = request.space_id().or(current.space);
        let moved = start != current.start_at
            || end != current.end_at
            || requested_space != current.space;
        let space = if moved {
            state.assign_space(requested_space, start, end, Some(id))?
        } else {
            current.space
        };

        let reservation = state.reservation_mut(id)?;
        reservation.title = request.title().to_string();
        reservation.description = request.description().map(str::to_string);
        reservation.start_at = start;
        reservation.end_at = end;
        reservation.space = space;
        Ok(reservation.clone())
    }

    fn list_mine(
        &self,
        window: DateWindow,
    ) -> std::result::Result<Vec<Reservation>, ServiceError> {
        let range = self.listing_range(window)?;
        let state = self.state.borrow();
        let user = state.require_user()?;
        let mut mine: Vec<Reservation> = state
            .reservations
            .iter()
            .filter(|r| r.created_by == user.id)
            .filter(|r| overlaps((r.start_at, r.end_at), range))
            .cloned()
            .collect();
        mine.sort_by_key(|r| r.start_at);
        Ok(mine)
    }

    fn list_all(
        &self,
        filter: StatusFilter,
        window: DateWindow,
    ) -> std::result::Result<Vec<Reservation>, ServiceError> {
        let range = self.listing_range(window)?;
        let state = self.state.borrow();
        let user = state.require_user()?;
        let mut visible: Vec<Reservation> = state
            .reservations
            .iter()
            .filter(|r| user.is_admin() || r.status.blocks_slot())
            .filter(|r| filter.matches(r))
            .filter(|r| overlaps((r.start_at, r.end_at), range))
            .cloned()
            .collect();
        visible.sort_by_key(|r| r.start_at);
        Ok(visible)
    }

    fn cancel(&self, id: ReservationId) -> std::result::Result<Reservation, ServiceError> {
        let mut state = self.state.borrow_mut();
        let user = state.require_user()?;
        let reservation = state.reservation_mut(id)?;
        if reservation.created_by != user.id && !user.is_admin() {
            return Err(ServiceError::detail(STATUS_FORBIDDEN, FORBIDDEN));
        }
        if !reservation.status.is_cancellable() {
            return Err(ServiceError::detail(STATUS_BAD_REQUEST, NOT_CANCELLABLE));
        }
        reservation.status = ReservationStatus::Cancelled;
        Ok(reservation.clone())
    }

    fn decide(
        &self,
        decision: &ReservationDecision,
    ) -> std::result::Result<Reservation, ServiceError> {
        let now = self.now();
        let mut state = self.state.borrow_mut();
        let admin = state.require_admin()?;
        let reservation = state.reservation_mut(decision.reservation_id)?;
        if !reservation.status.is_decidable() {
            return Err(ServiceError::detail(STATUS_BAD_REQUEST, NOT_DECIDABLE));
        }
        reservation.status = decision.decision.resulting_status();
        reservation.approved_by = Some(admin.id);
        reservation.decision_at = Some(now);
        reservation.decision_note.clone_from(&decision.note);
        log::debug!("reservation {} is now {}", reservation.id, reservation.status);
        Ok(reservation.clone())
    }
}

impl UserService for InMemoryBackend {
    fn list_users(&self) -> std::result::Result<Vec<User>, ServiceError> {
        let state = self.state.borrow();
        state.require_admin()?;
        Ok(state.accounts.iter().map(|a| a.user.clone()).collect())
    }

    fn create_user(&self, request: &UserRequest) -> std::result::Result<User, ServiceError> {
        let mut state = self.state.borrow_mut();
        state.require_admin()?;
        if state.email_taken(&request.email, None) {
            return Err(ServiceError::detail(STATUS_BAD_REQUEST, EMAIL_TAKEN));
        }
        let Some(password) = request.password.clone() else {
            return Err(ServiceError::detail(STATUS_BAD_REQUEST, PASSWORD_REQUIRED));
        };
        let user = User {
            id: UserId::new(next_id(&mut state.next_user)),
            email: request.email.clone(),
            first_name: request.first_name.clone(),
            last_name: request.last_name.clone(),
            role: request.role,
            is_active: request.is_active,
        };
        state.accounts.push(Account {
            user: user.clone(),
            password,
        });
        Ok(user)
    }

    fn update_user(
        &self,
        id: UserId,
        request: &UserRequest,
    ) -> std::result::Result<User, ServiceError> {
        let mut state = self.state.borrow_mut();
        state.require_admin()?;
        if state.email_taken(&request.email, Some(id)) {
            return Err(ServiceError::detail(STATUS_BAD_REQUEST, EMAIL_TAKEN));
        }
        let account = state
            .accounts
            .iter_mut()
            .find(|a| a.user.id == id)
            .ok_or_else(|| ServiceError::detail(STATUS_NOT_FOUND, NOT_FOUND))?;
        account.user.email.clone_from(&request.email);
        account.user.first_name.clone_from(&request.first_name);
        account.user.last_name.clone_from(&request.last_name);
        account.user.role = request.role;
        account.user.is_active = request.is_active;
        if let Some(password) = &request.password {
            account.password.clone_from(password);
        }
        Ok(account.user.clone())
    }

    fn deactivate_user(&self, id: UserId) -> std::result::Result<(), ServiceError> {
        let mut state = self.state.borrow_mut();
        state.require_admin()?;
        let account = state
            .accounts
            .iter_mut()
            .find(|a| a.user.id == id)
            .ok_or_else(|| ServiceError::detail(STATUS_NOT_FOUND, NOT_FOUND))?;
        account.user.is_active = false;
        Ok(())
    }
}
