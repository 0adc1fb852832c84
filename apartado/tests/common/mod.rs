//! Common test utilities for integration tests.
//!
//! Fixtures build an [`InMemoryBackend`] with a couple of spaces and accounts
//! so each test can sign in as whoever it needs.

use std::cell::RefCell;

use apartado::validation::parse_timestamp;
use apartado::{InMemoryBackend, Notifier, ReservationDraft, Role, Space, User};
use chrono::NaiveDateTime;

/// Frozen "now" used by every fixture backend.
pub const NOW: &str = "2025-01-01T08:00";

/// Parses a timestamp, panicking on malformed test input.
#[allow(dead_code)]
pub fn ts(value: &str) -> NaiveDateTime {
    parse_timestamp(value).unwrap_or_else(|| panic!("bad test timestamp {value}"))
}

/// A backend with two spaces, one teacher and one admin.
pub struct Campus {
    pub backend: InMemoryBackend,
    pub teacher: User,
    pub admin: User,
    pub lab_a: Space,
    pub lab_b: Space,
}

impl Campus {
    pub fn new() -> Self {
        let backend = InMemoryBackend::new().with_clock(ts(NOW));
        let lab_a = backend.add_space("Lab A", "Building 1");
        let lab_b = backend.add_space("Lab B", "Building 2");
        let teacher = backend.register("ana.lopez@school.edu", "secret1", Role::Teacher);
        let admin = backend.register("admin@school.edu", "adminpass", Role::Admin);
        Self {
            backend,
            teacher,
            admin,
            lab_a,
            lab_b,
        }
    }

    /// Signs the teacher in.
    #[allow(dead_code)]
    pub fn as_teacher(self) -> Self {
        self.backend.sign_in_as(self.teacher.id);
        self
    }

    /// Signs the admin in.
    #[allow(dead_code)]
    pub fn as_admin(self) -> Self {
        self.backend.sign_in_as(self.admin.id);
        self
    }
}

/// A valid one-hour reservation on 2025-01-02.
#[allow(dead_code)]
pub fn math_class() -> ReservationDraft {
    ReservationDraft::new("Math Class", "2025-01-02T10:00", "2025-01-02T11:00")
}

/// Records every message it is handed.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub successes: RefCell<Vec<String>>,
    pub errors: RefCell<Vec<String>>,
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.successes.borrow_mut().push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.errors.borrow_mut().push(message.to_string());
    }
}

#[allow(dead_code)]
impl RecordingNotifier {
    pub fn last_error(&self) -> Option<String> {
        self.errors.borrow().last().cloned()
    }

    pub fn last_success(&self) -> Option<String> {
        self.successes.borrow().last().cloned()
    }
}
