//! Shell completion generation command.
//!
//! The script goes to stdout; setup hints go to stderr so the output can be
//! redirected straight into a completions directory.

use crate::cli::Cli;
use crate::error::CliError;
use crate::utils::GlobalOptions;
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};
use std::io;

/// Name of the installed binary
const BIN_NAME: &str = "apartado";

/// Generate shell completion scripts
#[derive(Args)]
pub struct CompletionsCommand {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsCommand {
    /// Execute the completions command.
    pub fn execute(&self, global: &GlobalOptions) -> Result<(), CliError> {
        if !global.quiet {
            print_instructions(self.shell);
        }

        let mut cmd = Cli::command();
        generate(self.shell, &mut cmd, BIN_NAME, &mut io::stdout());
        Ok(())
    }
}

fn print_instructions(shell: Shell) {
    let install = match shell {
        Shell::Bash => Some(format!(
            "{BIN_NAME} completions bash > ~/.local/share/bash-completion/completions/{BIN_NAME}"
        )),
        Shell::Zsh => Some(format!(
            "{BIN_NAME} completions zsh > ~/.zsh/completions/_{BIN_NAME}"
        )),
        Shell::Fish => Some(format!(
            "{BIN_NAME} completions fish > ~/.config/fish/completions/{BIN_NAME}.fish"
        )),
        Shell::PowerShell => Some(format!("{BIN_NAME} completions powershell >> $PROFILE")),
        _ => None,
    };

    eprintln!("# {shell} completion script for {BIN_NAME}");
    if let Some(install) = install {
        eprintln!("# Install it with:");
        eprintln!("#   {install}");
    }
    eprintln!();
}
