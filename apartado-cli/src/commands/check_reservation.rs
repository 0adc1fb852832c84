//! Command to run a reservation through the full submission flow.
//!
//! The reservation is submitted to an in-memory backend, optionally seeded
//! from a calendar file, so both the client-side rules and the backend's
//! own checks (overlap, assignment, duration) are applied.

use crate::error::CliError;
use crate::utils::{
    load_configuration, parse_timestamp_arg, print_field_errors, print_json, resolve_format,
    GlobalOptions,
};
use apartado::{
    Calendar, FieldErrors, InMemoryBackend, LogNotifier, OutputFormat, Redirect, Reservation,
    ReservationDraft, ReservationForm, Role, SpaceId, SubmitError, ViolationKind,
};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Account the command submits as.
const CLI_USER_EMAIL: &str = "apartado.cli@localhost";

/// Run a reservation through the full submission flow.
#[derive(Args)]
pub struct CheckReservationCommand {
    /// Reservation title
    #[arg(long, default_value = "")]
    pub title: String,

    /// Start date and time (e.g. 2025-01-02T10:00)
    #[arg(long, value_name = "TIMESTAMP", default_value = "")]
    pub start: String,

    /// End date and time (e.g. 2025-01-02T11:00)
    #[arg(long, value_name = "TIMESTAMP", default_value = "")]
    pub end: String,

    /// Free-text description
    #[arg(long, default_value = "")]
    pub description: String,

    /// Space to reserve (assigned automatically when omitted)
    #[arg(long, value_name = "ID")]
    pub space: Option<u64>,

    /// Reject start dates before this instant
    #[arg(long, value_name = "TIMESTAMP")]
    pub now: Option<String>,

    /// YAML file with the spaces and reservations already on record
    #[arg(long, value_name = "FILE")]
    pub calendar: Option<PathBuf>,

    /// Output format (human, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,
}

/// JSON shape of the outcome.
#[derive(Debug, Serialize)]
struct ReservationReport<'a> {
    accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reservation: Option<&'a Reservation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    redirect: Option<Redirect>,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<ViolationKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    banner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a FieldErrors>,
}

impl CheckReservationCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let format = resolve_format(self.format, &config);
        let policy = config.duration_policy()?;
        let now = self
            .now
            .as_deref()
            .map(|value| parse_timestamp_arg("now", value))
            .transpose()?;

        let backend = match self.calendar {
            Some(ref path) => InMemoryBackend::from_calendar(Calendar::load(path)?),
            None => InMemoryBackend::new(),
        };
        let mut backend = backend.with_policy(policy);
        if let Some(now) = now {
            backend = backend.with_clock(now);
        }
        let user = backend.register(CLI_USER_EMAIL, "", Role::Teacher);
        backend.sign_in_as(user.id);

        let mut draft = ReservationDraft::new(self.title, self.start, self.end)
            .with_description(self.description);
        if let Some(id) = self.space {
            draft = draft.with_space(SpaceId::new(id));
        }

        let notifier = LogNotifier;
        let mut form = ReservationForm::new(&backend, &notifier)
            .with_rules(config.field_rules())
            .with_policy(policy)
            .with_redirect_delay(config.redirect_delay());
        if let Some(now) = now {
            form = form.with_now(now);
        }

        match form.submit(&draft) {
            Ok(accepted) => {
                match format {
                    OutputFormat::Json => print_json(&ReservationReport {
                        accepted: true,
                        reservation: Some(&accepted.value),
                        message: accepted.message.as_deref(),
                        redirect: accepted.redirect,
                        kind: None,
                        banner: None,
                        errors: None,
                    })?,
                    OutputFormat::Human => print_accepted(&accepted.value, global),
                }
                Ok(())
            }
            Err(err @ (SubmitError::Busy | SubmitError::Completed)) => Err(err.into()),
            Err(err) => {
                let errors = match &err {
                    SubmitError::Validation(errors) => Some(errors),
                    _ => None,
                };
                match format {
                    OutputFormat::Json => print_json(&ReservationReport {
                        accepted: false,
                        reservation: None,
                        message: None,
                        redirect: None,
                        kind: err.kind(),
                        banner: err.banner(),
                        errors,
                    })?,
                    OutputFormat::Human => match errors {
                        Some(errors) => print_field_errors(errors),
                        None => println!("{}", err.banner().unwrap_or_default()),
                    },
                }
                Err(CliError::Rejected(match err.kind() {
                    Some(kind) => format!("Reservation rejected ({kind})"),
                    None => "Reservation rejected".to_string(),
                }))
            }
        }
    }
}

fn print_accepted(reservation: &Reservation, global: &GlobalOptions) {
    if global.quiet {
        println!("{}", reservation.id);
        return;
    }

    println!("Accepted reservation {}", reservation.id);
    println!("  Title:  {}", reservation.title);
    println!(
        "  When:   {} - {}",
        reservation.start_at.format("%Y-%m-%d %H:%M"),
        reservation.end_at.format("%Y-%m-%d %H:%M")
    );
    match reservation.space {
        Some(space) => println!("  Space:  {space}"),
        None => println!("  Space:  unassigned"),
    }
    println!("  Status: {}", reservation.status);
}
