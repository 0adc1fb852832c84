//! Command to validate a single form field.

use crate::error::CliError;
use crate::utils::{
    load_configuration, parse_timestamp_arg, print_json, resolve_format, GlobalOptions,
};
use apartado::validation::parse_timestamp;
use apartado::{Field, FieldContext, FormMode, OutputFormat};
use clap::Args;
use serde::Serialize;

/// Validate a single form field.
#[derive(Args)]
pub struct CheckFieldCommand {
    /// Field name (title, start_at, end_at, email, password, first_name,
    /// last_name, space_name, space_description, space_location)
    #[arg(value_name = "FIELD")]
    pub field: Field,

    /// Value typed into the field
    #[arg(value_name = "VALUE", allow_hyphen_values = true)]
    pub value: String,

    /// Start date the end date is compared against
    #[arg(long, value_name = "TIMESTAMP")]
    pub start_at: Option<String>,

    /// Validate as an edit form (a blank password keeps the old one)
    #[arg(long)]
    pub editing: bool,

    /// Reject start dates before this instant
    #[arg(long, value_name = "TIMESTAMP")]
    pub now: Option<String>,

    /// Output format (human, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,
}

#[derive(Debug, Serialize)]
struct FieldReport<'a> {
    field: &'a str,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl CheckFieldCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let format = resolve_format(self.format, &config);

        let mode = if self.editing {
            FormMode::Edit
        } else {
            FormMode::Create
        };
        // an unparseable start is reported on its own field, not here
        let start_at = self.start_at.as_deref().and_then(parse_timestamp);
        let mut ctx = FieldContext::new().with_mode(mode).with_start_at(start_at);
        if let Some(ref now) = self.now {
            ctx = ctx.with_now(parse_timestamp_arg("now", now)?);
        }

        let outcome = config.field_rules().validate(self.field, &self.value, &ctx);
        let message = outcome.as_ref().err().map(ToString::to_string);

        match format {
            OutputFormat::Json => print_json(&FieldReport {
                field: self.field.name(),
                valid: outcome.is_ok(),
                message: message.clone(),
            })?,
            OutputFormat::Human => match message {
                Some(ref message) => println!("{message}"),
                None if !global.quiet => println!("Valid"),
                None => {}
            },
        }

        match message {
            Some(message) => Err(CliError::Rejected(format!("{}: {message}", self.field))),
            None => Ok(()),
        }
    }
}
