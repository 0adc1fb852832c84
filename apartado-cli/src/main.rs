//! Main entry point for the apartado CLI.
//!
//! The commands run the reservation admission rules against command-line
//! input:
//! - `check-reservation`: submit a reservation to an in-memory backend
//! - `check-field`, `check-login`, `check-user`, `check-space`: run the
//!   field validators of one form
//! - `policy`: show the effective configuration

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

fn main() {
    let cli = Cli::parse();

    // library code logs through the `log` facade
    let _ = apartado::init_logger(cli.verbose, cli.quiet).install();

    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        config: cli.config,
    };

    let result = match cli.command {
        cli::Command::CheckReservation(cmd) => cmd.execute(&global),
        cli::Command::CheckField(cmd) => cmd.execute(&global),
        cli::Command::CheckLogin(cmd) => cmd.execute(&global),
        cli::Command::CheckUser(cmd) => cmd.execute(&global),
        cli::Command::CheckSpace(cmd) => cmd.execute(&global),
        cli::Command::Policy(cmd) => cmd.execute(&global),
        cli::Command::Validate(cmd) => cmd.execute(&global),
        cli::Command::Completions(cmd) => cmd.execute(&global),
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            if !global.quiet {
                eprintln!("Error: {e}");
            }
            std::process::exit(e.exit_code());
        }
    }
}
