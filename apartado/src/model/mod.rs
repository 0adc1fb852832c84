//! Data model shared by the validators, forms and collaborators.

pub mod id;
pub mod reservation;
pub mod space;
pub mod user;

pub use id::{ReservationId, SpaceId, UserId};
pub use reservation::{
    DateWindow, DecisionType, Reservation, ReservationDecision, ReservationDraft,
    ReservationRequest, ReservationStatus, StatusCounts, StatusFilter, DEFAULT_LISTING_DAYS,
};
pub use space::{Space, SpaceDraft, SpaceRequest};
pub use user::{Credentials, Role, User, UserDraft, UserRequest};
