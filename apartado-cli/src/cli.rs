//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{
    CheckFieldCommand, CheckLoginCommand, CheckReservationCommand, CheckSpaceCommand,
    CheckUserCommand, CompletionsCommand, PolicyCommand, ValidateCommand,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line tool for checking reservations against the admission rules.
#[derive(Parser)]
#[command(name = "apartado")]
#[command(
    version,
    about = "Check LibApartado reservations against the admission rules",
    long_about = None
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Use this configuration file instead of discovering apartado.yaml
    #[arg(long, value_name = "PATH", global = true, env = "APARTADO_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Run a reservation through the full submission flow
    CheckReservation(CheckReservationCommand),

    /// Validate a single form field
    CheckField(CheckFieldCommand),

    /// Validate login credentials
    CheckLogin(CheckLoginCommand),

    /// Validate the admin user form
    CheckUser(CheckUserCommand),

    /// Validate the admin space form
    CheckSpace(CheckSpaceCommand),

    /// Show the effective duration policy and field rules
    Policy(PolicyCommand),

    /// Validate a configuration file
    Validate(ValidateCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}
