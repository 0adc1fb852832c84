//! Configuration system for apartado.
//!
//! Settings are merged from several sources, highest precedence first:
//!
//! 1. Programmatic overrides (via `ConfigBuilder::with_config`)
//! 2. Environment variables (`APARTADO_*`)
//! 3. Project config (`apartado.yaml`, nearest one walking up)
//! 4. User config (`~/.apartado/config.yaml`)
//! 5. Built-in defaults
//!
//! # Examples
//!
//! ```
//! use apartado::config::{Config, ConfigBuilder, RulesConfig};
//!
//! let config = ConfigBuilder::new()
//!     .skip_files()
//!     .skip_env()
//!     .with_config(Config {
//!         rules: Some(RulesConfig {
//!             title_min_length: Some(5),
//!             ..Default::default()
//!         }),
//!         ..Default::default()
//!     })
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.field_rules().title_min_length, 5);
//! ```

pub mod builder;
pub mod environment;
pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

pub use builder::ConfigBuilder;
pub use environment::EnvironmentConfig;
pub use loader::{ConfigLoader, ConfigSource};
pub use merger::ConfigMerger;
pub use schema::{
    Config, OutputFormat, PolicyConfig, RulesConfig, SubmissionConfig, MAX_REDIRECT_DELAY_MS,
};
pub use validator::ConfigValidator;
