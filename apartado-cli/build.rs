//! Build script for apartado-cli.
//!
//! Renders the `apartado.1` man page into OUT_DIR with clap_mangen.
//!
//! Build scripts cannot depend on the crate being built, so the command
//! tree is described again here.

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Keep in step with src/cli.rs.
fn build_cli() -> Command {
    Command::new("apartado")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Check LibApartado reservations against the admission rules")
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("Use this configuration file instead of discovering apartado.yaml")
                .value_name("PATH")
                .global(true)
                .env("APARTADO_CONFIG"),
        )
        .subcommands([
            Command::new("check-reservation")
                .about("Run a reservation through the full submission flow"),
            Command::new("check-field").about("Validate a single form field"),
            Command::new("check-login").about("Validate login credentials"),
            Command::new("check-user").about("Validate the admin user form"),
            Command::new("check-space").about("Validate the admin space form"),
            Command::new("policy").about("Show the effective duration policy and field rules"),
            Command::new("validate").about("Validate a configuration file"),
            Command::new("completions").about("Generate shell completion scripts"),
        ])
}

fn main() -> io::Result<()> {
    let out_dir = PathBuf::from(env::var_os("OUT_DIR").ok_or(io::ErrorKind::NotFound)?);
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir)?;

    let mut buffer = Vec::new();
    Man::new(build_cli()).render(&mut buffer)?;
    fs::write(man_dir.join("apartado.1"), buffer)?;

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=build.rs");
    Ok(())
}
