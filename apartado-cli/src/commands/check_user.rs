//! Command to validate the admin user form.

use crate::error::CliError;
use crate::utils::{field_errors, load_configuration, report_check, resolve_format, GlobalOptions};
use apartado::{InMemoryBackend, LogNotifier, OutputFormat, Role, UserDraft, UserForm, UserId};
use clap::Args;

/// Validate the admin user form.
#[derive(Args)]
pub struct CheckUserCommand {
    /// Login e-mail
    #[arg(long, default_value = "")]
    pub email: String,

    /// Given name
    #[arg(long, default_value = "")]
    pub first_name: String,

    /// Surname
    #[arg(long, default_value = "")]
    pub last_name: String,

    /// Password (may be left out with --editing)
    #[arg(long, default_value = "")]
    pub password: String,

    /// Account role (admin, teacher)
    #[arg(long, default_value = "teacher")]
    pub role: Role,

    /// Validate as an edit of an existing account
    #[arg(long)]
    pub editing: bool,

    /// Output format (human, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,
}

impl CheckUserCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let format = resolve_format(self.format, &config);

        let backend = InMemoryBackend::new();
        let notifier = LogNotifier;
        let mut form = UserForm::new(&backend, &notifier).with_rules(config.field_rules());
        if self.editing {
            // validation only looks at the mode, not at the account
            form = form.editing(UserId::new(0));
        }

        let draft = UserDraft {
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            role: self.role,
            password: self.password,
            is_active: true,
        };
        let errors = field_errors(form.validate(&draft))?;
        report_check(format, &errors, global)
    }
}
