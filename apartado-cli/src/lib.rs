//! Library exports for apartado-cli.
//!
//! The CLI structure is exported so that documentation tooling can render
//! it (man pages, completions) without running the binary.

pub mod cli;
pub mod commands;
pub mod error;
pub mod utils;

pub use cli::Cli;
