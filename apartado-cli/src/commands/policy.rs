//! Command to show the effective duration policy and field rules.

use crate::error::CliError;
use crate::utils::{load_configuration, print_json, resolve_format, GlobalOptions};
use apartado::OutputFormat;
use clap::Args;
use serde::Serialize;

/// Show the effective duration policy and field rules.
#[derive(Args)]
pub struct PolicyCommand {
    /// Output format (human, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,
}

#[derive(Debug, Serialize)]
struct PolicyReport {
    min_duration_minutes: i64,
    max_duration_minutes: i64,
    title_min_length: usize,
    password_min_length: usize,
    space_name_min_length: usize,
    redirect_delay_ms: u128,
}

impl PolicyCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let policy = config.duration_policy()?;
        let rules = config.field_rules();

        let report = PolicyReport {
            min_duration_minutes: policy.min_minutes(),
            max_duration_minutes: policy.max_minutes(),
            title_min_length: rules.title_min_length,
            password_min_length: rules.password_min_length,
            space_name_min_length: rules.space_name_min_length,
            redirect_delay_ms: config.redirect_delay().as_millis(),
        };

        match resolve_format(self.format, &config) {
            OutputFormat::Json => print_json(&report)?,
            OutputFormat::Human => {
                println!("Minimum duration:      {} minutes", report.min_duration_minutes);
                println!("Maximum duration:      {} minutes", report.max_duration_minutes);
                println!("Title min length:      {}", report.title_min_length);
                println!("Password min length:   {}", report.password_min_length);
                println!("Space name min length: {}", report.space_name_min_length);
                println!("Redirect delay:        {} ms", report.redirect_delay_ms);
            }
        }
        Ok(())
    }
}
