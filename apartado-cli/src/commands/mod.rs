//! CLI command implementations.
//!
//! - `check_reservation`: Run a reservation through the submission flow
//! - `check_field`: Validate a single form field
//! - `check_login`: Validate login credentials
//! - `check_user`: Validate the admin user form
//! - `check_space`: Validate the admin space form
//! - `policy`: Show the effective policy and field rules
//! - `validate`: Validate a configuration file
//! - `completions`: Generate shell completion scripts

pub mod check_field;
pub mod check_login;
pub mod check_reservation;
pub mod check_space;
pub mod check_user;
pub mod completions;
pub mod policy;
pub mod validate;

pub use check_field::CheckFieldCommand;
pub use check_login::CheckLoginCommand;
pub use check_reservation::CheckReservationCommand;
pub use check_space::CheckSpaceCommand;
pub use check_user::CheckUserCommand;
pub use completions::CompletionsCommand;
pub use policy::PolicyCommand;
pub use validate::ValidateCommand;
