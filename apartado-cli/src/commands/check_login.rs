//! Command to validate login credentials.

use crate::error::CliError;
use crate::utils::{field_errors, load_configuration, report_check, resolve_format, GlobalOptions};
use apartado::{InMemoryBackend, LogNotifier, LoginForm, OutputFormat};
use clap::Args;

/// Validate login credentials without signing in.
#[derive(Args)]
pub struct CheckLoginCommand {
    /// Login e-mail
    #[arg(long, default_value = "")]
    pub email: String,

    /// Password
    #[arg(long, default_value = "")]
    pub password: String,

    /// Output format (human, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,
}

impl CheckLoginCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let format = resolve_format(self.format, &config);

        let backend = InMemoryBackend::new();
        let notifier = LogNotifier;
        let mut form = LoginForm::new(&backend, &notifier);
        form.set_email(self.email);
        form.set_password(self.password);

        let errors = field_errors(form.validate())?;
        report_check(format, &errors, global)
    }
}
