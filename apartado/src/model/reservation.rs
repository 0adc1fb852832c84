//! Reservation records, requests and admin decisions.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::model::id::{ReservationId, SpaceId, UserId};
use crate::validation::duration::{overlaps, PolicyViolation};

/// Lifecycle status of a reservation on the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    /// Waiting for an administrator decision.
    Pending,
    /// Approved by an administrator.
    Approved,
    /// Rejected by an administrator.
    Rejected,
    /// Cancelled by its owner or an administrator.
    Cancelled,
}

impl ReservationStatus {
    /// All statuses, in the order the listing screens show them.
    pub const ALL: [Self; 4] = [Self::Pending, Self::Approved, Self::Rejected, Self::Cancelled];

    /// Whether a reservation in this status occupies its time slot.
    #[must_use]
    pub const fn blocks_slot(self) -> bool {
        matches!(self, Self::Pending | Self::Approved)
    }

    /// Whether an administrator may still approve or reject it.
    #[must_use]
    pub const fn is_decidable(self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Whether it may still be cancelled.
    #[must_use]
    pub const fn is_cancellable(self) -> bool {
        matches!(self, Self::Pending | Self::Approved)
    }

    /// Wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "APPROVED" => Ok(Self::Approved),
            "REJECTED" => Ok(Self::Rejected),
            "CANCELLED" => Ok(Self::Cancelled),
            other => Err(format!("unknown reservation status: {other}")),
        }
    }
}

/// A reservation as recorded by the backend of record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    /// Backend identifier.
    pub id: ReservationId,
    /// Assigned space, if any.
    pub space: Option<SpaceId>,
    /// Owner of the reservation.
    pub created_by: UserId,
    /// Short title shown in listings.
    pub title: String,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Start of the reserved interval.
    pub start_at: NaiveDateTime,
    /// End of the reserved interval (exclusive).
    pub end_at: NaiveDateTime,
    /// Current lifecycle status.
    pub status: ReservationStatus,
    /// Administrator who decided it.
    #[serde(default)]
    pub approved_by: Option<UserId>,
    /// When the decision was taken.
    #[serde(default)]
    pub decision_at: Option<NaiveDateTime>,
    /// Note attached to the decision.
    #[serde(default)]
    pub decision_note: Option<String>,
}

impl Reservation {
    /// Whether this reservation occupies `space` somewhere in `[start, end)`.
    ///
    /// Rejected and cancelled reservations never conflict.
    #[must_use]
    pub fn conflicts_with(&self, space: SpaceId, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.status.blocks_slot()
            && self.space == Some(space)
            && overlaps((self.start_at, self.end_at), (start, end))
    }
}

/// Raw state of the reservation form, exactly as typed by the user.
///
/// Date fields use the `YYYY-MM-DDTHH:MM` shape of a `datetime-local`
/// input. No `space` means automatic assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationDraft {
    /// Title field.
    pub title: String,
    /// Description field.
    pub description: String,
    /// Selected space, `None` for automatic assignment.
    #[serde(default)]
    pub space: Option<SpaceId>,
    /// Start date and time field.
    pub start_at: String,
    /// End date and time field.
    pub end_at: String,
}

impl ReservationDraft {
    /// Creates a draft with the three required fields filled in.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        start_at: impl Into<String>,
        end_at: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            start_at: start_at.into(),
            end_at: end_at.into(),
            ..Self::default()
        }
    }

    /// Sets the description field.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Selects a space.
    #[must_use]
    pub fn with_space(mut self, space: SpaceId) -> Self {
        self.space = Some(space);
        self
    }
}

/// A reservation request that passed every admission rule.
///
/// Instances are produced by [`crate::form::ReservationForm::validate`];
/// the title length and duration invariants hold for every value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReservationRequest {
    pub(crate) title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<String>,
    #[serde(rename = "space", skip_serializing_if = "Option::is_none")]
    pub(crate) space_id: Option<SpaceId>,
    pub(crate) start_at: NaiveDateTime,
    pub(crate) end_at: NaiveDateTime,
}

impl ReservationRequest {
    /// Requested title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Requested description, if one was given.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Requested space; `None` asks the backend to pick one.
    #[must_use]
    pub const fn space_id(&self) -> Option<SpaceId> {
        self.space_id
    }

    /// Start of the interval.
    #[must_use]
    pub const fn start_at(&self) -> NaiveDateTime {
        self.start_at
    }

    /// End of the interval.
    #[must_use]
    pub const fn end_at(&self) -> NaiveDateTime {
        self.end_at
    }

    /// Whole minutes between start and end.
    #[must_use]
    pub fn duration_minutes(&self) -> i64 {
        (self.end_at - self.start_at).num_minutes()
    }
}

/// Kind of administrator decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionType {
    /// Approve the reservation.
    Approve,
    /// Reject the reservation.
    Reject,
}

impl DecisionType {
    /// Status the reservation ends up in.
    #[must_use]
    pub const fn resulting_status(self) -> ReservationStatus {
        match self {
            Self::Approve => ReservationStatus::Approved,
            Self::Reject => ReservationStatus::Rejected,
        }
    }
}

impl fmt::Display for DecisionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Approve => f.write_str("approve"),
            Self::Reject => f.write_str("reject"),
        }
    }
}

/// An administrator's approve/reject action on a pending reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationDecision {
    /// Reservation being decided.
    pub reservation_id: ReservationId,
    /// Approve or reject.
    pub decision: DecisionType,
    /// Optional free-text note.
    pub note: Option<String>,
}

impl ReservationDecision {
    /// Builds a decision; a blank note is dropped.
    #[must_use]
    pub fn new(reservation_id: ReservationId, decision: DecisionType, note: Option<String>) -> Self {
        let note = note
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        Self {
            reservation_id,
            decision,
            note,
        }
    }
}

/// Status filter of the reservation listing screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    /// Every reservation.
    #[default]
    All,
    /// Only reservations in one status.
    Only(ReservationStatus),
}

impl StatusFilter {
    /// Whether `reservation` passes the filter.
    #[must_use]
    pub fn matches(self, reservation: &Reservation) -> bool {
        match self {
            Self::All => true,
            Self::Only(status) => reservation.status == status,
        }
    }

    /// Filters a listing, keeping its order.
    #[must_use]
    pub fn apply(self, reservations: &[Reservation]) -> Vec<&Reservation> {
        reservations.iter().filter(|r| self.matches(r)).collect()
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

/// Days a listing covers when no end is given.
pub const DEFAULT_LISTING_DAYS: i64 = 30;

/// Time range of a reservation listing.
///
/// A missing start means "now"; a missing end means
/// [`DEFAULT_LISTING_DAYS`] after now. A reservation is listed when it
/// overlaps the resolved range.
///
/// # Examples
///
/// ```
/// use apartado::model::DateWindow;
/// use apartado::validation::parse_timestamp;
///
/// let now = parse_timestamp("2025-01-01T08:00").unwrap();
/// let (start, end) = DateWindow::default().resolve(now).unwrap();
/// assert_eq!(start, now);
/// assert_eq!((end - start).num_days(), 30);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateWindow {
    /// Lower bound, exclusive of reservations ending at it.
    pub start: Option<NaiveDateTime>,
    /// Upper bound, exclusive of reservations starting at it.
    pub end: Option<NaiveDateTime>,
}

impl DateWindow {
    /// A window with both bounds set.
    #[must_use]
    pub const fn between(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Fills the missing bounds relative to `now`.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyViolation::OrderViolation`] unless start < end.
    pub fn resolve(
        self,
        now: NaiveDateTime,
    ) -> Result<(NaiveDateTime, NaiveDateTime), PolicyViolation> {
        let start = self.start.unwrap_or(now);
        let end = self
            .end
            .unwrap_or_else(|| now + Duration::days(DEFAULT_LISTING_DAYS));
        if start >= end {
            return Err(PolicyViolation::OrderViolation);
        }
        Ok((start, end))
    }
}

/// Per-status counts shown on the filter buttons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    /// Pending reservations.
    pub pending: usize,
    /// Approved reservations.
    pub approved: usize,
    /// Rejected reservations.
    pub rejected: usize,
    /// Cancelled reservations.
    pub cancelled: usize,
    /// All reservations.
    pub total: usize,
}

impl StatusCounts {
    /// Counts a listing.
    #[must_use]
    pub fn tally(reservations: &[Reservation]) -> Self {
        reservations.iter().fold(Self::default(), |mut counts, r| {
            match r.status {
                ReservationStatus::Pending => counts.pending += 1,
                ReservationStatus::Approved => counts.approved += 1,
                ReservationStatus::Rejected => counts.rejected += 1,
                ReservationStatus::Cancelled => counts.cancelled += 1,
            }
            counts.total += 1;
            counts
        })
    }

    /// Count for the given filter.
    #[must_use]
    pub const fn get(&self, filter: StatusFilter) -> usize {
        match filter {
            StatusFilter::All => self.total,
            StatusFilter::Only(ReservationStatus::Pending) => self.pending,
            StatusFilter::Only(ReservationStatus::Approved) => self.approved,
            StatusFilter::Only(ReservationStatus::Rejected) => self.rejected,
            StatusFilter::Only(ReservationStatus::Cancelled) => self.cancelled,
        }
    }
}
