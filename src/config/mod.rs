//! Configuration loading for squadplan.
//!
//! Supports squadplan.toml, CLI flags, and environment variables.
//! Precedence (highest to lowest): CLI flags > env vars > config file > defaults.

mod cli;
mod env;
mod toml;
mod types;

pub use cli::{parse_args, CliArgs, Command};
pub use types::{
    Config, ConfigError, OutputFormat, DEFAULT_CONFIG_FILE, DEFAULT_PLAN_FILE,
    DEFAULT_SPRINT_LENGTH_DAYS,
};
