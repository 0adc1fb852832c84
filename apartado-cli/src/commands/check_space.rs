//! Command to validate the admin space form.

use crate::error::CliError;
use crate::utils::{field_errors, load_configuration, report_check, resolve_format, GlobalOptions};
use apartado::{InMemoryBackend, LogNotifier, OutputFormat, SpaceDraft, SpaceForm};
use clap::Args;

/// Validate the admin space form.
#[derive(Args)]
pub struct CheckSpaceCommand {
    /// Display name
    #[arg(long, default_value = "")]
    pub name: String,

    /// Description
    #[arg(long, default_value = "")]
    pub description: String,

    /// Location
    #[arg(long, default_value = "")]
    pub location: String,

    /// Output format (human, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,
}

impl CheckSpaceCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let format = resolve_format(self.format, &config);

        let backend = InMemoryBackend::new();
        let notifier = LogNotifier;
        let form = SpaceForm::new(&backend, &notifier).with_rules(config.field_rules());

        let draft = SpaceDraft {
            name: self.name,
            description: self.description,
            location: self.location,
            is_active: true,
        };
        let errors = field_errors(form.validate(&draft))?;
        report_check(format, &errors, global)
    }
}
