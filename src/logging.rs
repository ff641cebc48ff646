//! Logging setup for the binary.
//!
//! Events go to stderr so report output on stdout stays parseable.

use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Environment variable holding a full filter directive.
pub const LOG_ENV: &str = "SQUADPLAN_LOG";

/// Pick the filter directive: `SQUADPLAN_LOG`, then `RUST_LOG`, then the
/// configured level.
pub fn filter_directive(configured: &str, squadplan_log: Option<String>, rust_log: Option<String>) -> String {
    squadplan_log
        .filter(|v| !v.trim().is_empty())
        .or_else(|| rust_log.filter(|v| !v.trim().is_empty()))
        .unwrap_or_else(|| configured.to_string())
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init_logging(config: &Config) {
    let directive = filter_directive(
        &config.log_level,
        std::env::var(LOG_ENV).ok(),
        std::env::var("RUST_LOG").ok(),
    );
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(config.color)
        .with_target(false)
        .try_init()
        .is_ok();

    if installed {
        debug!(%directive, "logging initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_prefers_squadplan_log() {
        let d = filter_directive("warn", Some("debug".into()), Some("trace".into()));
        assert_eq!(d, "debug");
    }

    #[test]
    fn test_filter_falls_back_to_rust_log() {
        assert_eq!(filter_directive("warn", None, Some("info".into())), "info");
        assert_eq!(filter_directive("warn", Some("  ".into()), Some("info".into())), "info");
    }

    #[test]
    fn test_filter_uses_configured_level() {
        assert_eq!(filter_directive("squadplan=trace", None, None), "squadplan=trace");
        assert_eq!(filter_directive("warn", None, Some(String::new())), "warn");
    }
}
