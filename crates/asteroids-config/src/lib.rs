//! Configuration for the asteroid field.
//!
//! Settings persist to disk as `config.ron`, fill in missing fields from
//! defaults, and can be overridden per run from the command line.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CONFIG_FILE_NAME, Config, DebugConfig, FieldConfig, GenerationConfig, UvMapping,
    default_config_dir,
};
pub use error::ConfigError;
