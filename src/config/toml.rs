use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::role::RoleMap;

use super::types::{ConfigError, OutputFormat};

/// Raw shape of `squadplan.toml`. Every key is optional; unknown keys are
/// ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct FileConfig {
    pub plan: PlanSection,
    pub output: OutputSection,
    pub log: LogSection,
    /// Role names are checked strictly.
    pub staffing: Option<RoleMap>,
    pub sprints: SprintsSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct PlanSection {
    pub file: Option<PathBuf>,
    pub project: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct OutputSection {
    pub format: Option<OutputFormat>,
    pub color: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct LogSection {
    pub level: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct SprintsSection {
    pub length_days: Option<u32>,
}

pub(super) fn load_from_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_toml(&content)
}

pub(super) fn parse_toml(content: &str) -> Result<FileConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}
