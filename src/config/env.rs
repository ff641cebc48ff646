use std::env;
use std::path::PathBuf;

use super::types::{Config, OutputFormat};

pub(super) fn apply_env(config: &mut Config) {
    if let Ok(val) = env::var("SQUADPLAN_PLAN") {
        config.plan_file = PathBuf::from(val);
    }
    if let Ok(val) = env::var("SQUADPLAN_FORMAT") {
        if let Some(format) = OutputFormat::parse(&val) {
            config.output_format = format;
        }
    }
    if let Ok(val) = env::var("SQUADPLAN_COLOR") {
        config.color = val == "true" || val == "1";
    }
    if env::var_os("NO_COLOR").is_some() {
        config.color = false;
    }
    if let Ok(val) = env::var("SQUADPLAN_LOG_LEVEL") {
        config.log_level = val;
    }
    if let Ok(val) = env::var("SQUADPLAN_SPRINT_LENGTH") {
        if let Ok(n) = val.parse() {
            config.sprint_length_days = n;
        }
    }
    if let Ok(val) = env::var("SQUADPLAN_PROJECT") {
        config.project = Some(val);
    }
}
