#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # apartado
//!
//! Admission validation for space reservations.
//!
//! This library decides whether a reservation, login, user or space form may
//! be submitted, drives each form through its submission states, and maps
//! backend failures to the messages shown to the user.
//!
//! ## Core Types
//!
//! - [`DurationPolicy`]: minimum and maximum reservation length
//! - [`FieldRules`] and [`validate_field`]: per-field input rules
//! - [`ReservationForm`], [`LoginForm`] and the admin forms: submission
//!   orchestrators
//! - [`InMemoryBackend`]: an in-process implementation of every collaborator
//! - [`Error`] and [`Result`]: Error handling types
//! - [`Logger`] and [`LogLevel`]: Logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use apartado::{Field, FieldContext, validate_field, DurationPolicy, PolicyViolation};
//! use apartado::validation::parse_timestamp;
//!
//! let ctx = FieldContext::new();
//! assert!(validate_field(Field::Title, "Math Class", &ctx).is_ok());
//! assert!(validate_field(Field::Title, "ab", &ctx).is_err());
//!
//! let policy = DurationPolicy::default();
//! let start = parse_timestamp("2025-01-01T10:00");
//! let end = parse_timestamp("2025-01-01T10:20");
//! assert!(matches!(
//!     policy.validate(start, end),
//!     Some(PolicyViolation::TooShort { .. })
//! ));
//! ```

pub mod config;
pub mod error;
pub mod form;
pub mod logging;
pub mod model;
pub mod service;
pub mod validation;

// Re-export key types at crate root for convenience
pub use config::{Config, ConfigBuilder, OutputFormat};
pub use error::{Error, Result};
pub use form::{
    Accepted, Cancellation, DecisionForm, FormMachine, FormState, LoginForm, Redirect,
    ReservationForm, Route, SpaceForm, SubmitError, UserForm,
};
pub use logging::{init_logger, LogLevel, Logger};
pub use model::{
    Credentials, DateWindow, DecisionType, Reservation, ReservationDecision, ReservationDraft,
    ReservationId, ReservationRequest, ReservationStatus, Role, Space, SpaceDraft, SpaceId,
    StatusFilter, User, UserDraft, UserId,
};
pub use service::{
    AuthContext, AuthService, Calendar, InMemoryBackend, LogNotifier, Notifier,
    ReservationService, ServiceError, Session, SpaceService, UserService,
};
pub use validation::{
    validate_field, DurationPolicy, Field, FieldContext, FieldError, FieldErrorKind,
    FieldErrors, FieldRules, FormMode, PolicyViolation, ViolationKind,
};
