use std::path::{Path, PathBuf};

use crate::plan::DEFAULT_HEADCOUNT;
use crate::role::RoleMap;

use super::cli::CliArgs;
use super::toml::FileConfig;
use super::{env, toml};

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "squadplan.toml";

/// Default plan document looked up in the working directory.
pub const DEFAULT_PLAN_FILE: &str = "plan.toml";

/// Calendar days from a new sprint's start to its end.
pub const DEFAULT_SPRINT_LENGTH_DAYS: u32 = 14;

/// Report rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable tables.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
        }
    }
}

/// squadplan configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Plan document to operate on.
    pub plan_file: PathBuf,
    pub output_format: OutputFormat,
    /// Emit ANSI colors in text output.
    pub color: bool,
    /// `tracing` filter directive used when `SQUADPLAN_LOG`/`RUST_LOG` is unset.
    pub log_level: String,
    /// Headcount for SprintSquads created by sprint extension.
    pub default_headcount: RoleMap,
    pub sprint_length_days: u32,
    /// Restrict reports to one project.
    pub project: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            plan_file: PathBuf::from(DEFAULT_PLAN_FILE),
            output_format: OutputFormat::Text,
            color: true,
            log_level: "warn".to_string(),
            default_headcount: DEFAULT_HEADCOUNT,
            sprint_length_days: DEFAULT_SPRINT_LENGTH_DAYS,
            project: None,
        }
    }
}

impl Config {
    /// Load configuration from all sources with proper precedence.
    ///
    /// Precedence: CLI args > env vars > config file > defaults. An explicit
    /// `--config` path must exist; the default file is optional.
    pub fn load(cli_args: &CliArgs) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(ref path) = cli_args.config {
            config.merge_from(Self::read_file(path)?);
        } else if Path::new(DEFAULT_CONFIG_FILE).exists() {
            config.merge_from(Self::read_file(Path::new(DEFAULT_CONFIG_FILE))?);
        }

        config.apply_env();
        config.apply_cli(cli_args);
        Ok(config)
    }

    /// Load a config file on top of the defaults.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.merge_from(Self::read_file(path.as_ref())?);
        Ok(config)
    }

    /// Parse TOML content on top of the defaults.
    pub fn parse_toml(content: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.merge_from(toml::parse_toml(content)?);
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
        toml::load_from_file(path)
    }

    fn apply_env(&mut self) {
        env::apply_env(self);
    }

    /// Apply CLI arguments.
    pub(super) fn apply_cli(&mut self, args: &CliArgs) {
        if let Some(ref path) = args.plan {
            self.plan_file = path.clone();
        }
        if let Some(format) = args.format {
            self.output_format = format;
        }
        if args.no_color {
            self.color = false;
        }
        match args.verbose {
            0 => {}
            1 => self.log_level = "info".to_string(),
            2 => self.log_level = "debug".to_string(),
            _ => self.log_level = "trace".to_string(),
        }
        if let Some(ref project) = args.project {
            self.project = Some(project.clone());
        }
    }

    /// Overlay the keys a config file actually sets.
    fn merge_from(&mut self, file: FileConfig) {
        if let Some(path) = file.plan.file {
            self.plan_file = path;
        }
        if let Some(format) = file.output.format {
            self.output_format = format;
        }
        if let Some(color) = file.output.color {
            self.color = color;
        }
        if let Some(level) = file.log.level {
            self.log_level = level;
        }
        if let Some(headcount) = file.staffing {
            self.default_headcount = headcount;
        }
        if let Some(days) = file.sprints.length_days {
            self.sprint_length_days = days;
        }
        if let Some(project) = file.plan.project {
            self.project = Some(project);
        }
    }

    /// Generate default squadplan.toml content.
    pub fn default_toml() -> String {
        format!(
            r#"# squadplan configuration

[plan]
file = "{}"

[output]
format = "text"
color = true

[log]
level = "warn"

[staffing]
backend = {}
android = {}
ios = {}
qa = {}
qa_automation = {}

[sprints]
length_days = {}
"#,
            DEFAULT_PLAN_FILE,
            DEFAULT_HEADCOUNT.backend,
            DEFAULT_HEADCOUNT.android,
            DEFAULT_HEADCOUNT.ios,
            DEFAULT_HEADCOUNT.qa,
            DEFAULT_HEADCOUNT.qa_automation,
            DEFAULT_SPRINT_LENGTH_DAYS
        )
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading the config file.
    #[error("config I/O error: {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Malformed config file.
    #[error("config parse error: {0}")]
    Parse(#[from] ::toml::de::Error),
}
