//! Terminal color utilities using ANSI escape codes.
//!
//! Provides colored output for utilization bands, issue severities and
//! report headings. Every helper takes an `enabled` flag so `--no-color`
//! output stays byte-clean.

use crate::audit::Severity;
use crate::capacity::UtilizationBand;

/// ANSI color codes
pub mod codes {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";

    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";

    pub const BRIGHT_CYAN: &str = "\x1b[96m";
}

use codes::*;

fn paint(enabled: bool, style: &str, text: &str) -> String {
    if enabled {
        format!("{}{}{}", style, text, RESET)
    } else {
        text.to_string()
    }
}

/// Color for a utilization band.
pub fn band_color(band: UtilizationBand) -> &'static str {
    match band {
        UtilizationBand::Overloaded => RED,
        UtilizationBand::Warning => YELLOW,
        UtilizationBand::Healthy => GREEN,
        UtilizationBand::Idle => BLUE,
    }
}

/// Format a utilization percentage in its band color.
pub fn utilization(value: f64, enabled: bool) -> String {
    let band = UtilizationBand::classify(value);
    paint(enabled, band_color(band), &format!("{:.0}%", value))
}

/// Severity tag, e.g. `HIGH` in bold red.
pub fn severity(severity: Severity, enabled: bool) -> String {
    let tag = severity.as_str().to_uppercase();
    match severity {
        Severity::High => paint(enabled, &format!("{}{}", BOLD, RED), &tag),
        Severity::Medium => paint(enabled, YELLOW, &tag),
    }
}

/// Color success messages (green).
pub fn success(text: &str, enabled: bool) -> String {
    paint(enabled, GREEN, text)
}

/// Color warning messages (yellow).
pub fn warning(text: &str, enabled: bool) -> String {
    paint(enabled, YELLOW, text)
}

/// Color info messages (cyan).
pub fn info(text: &str, enabled: bool) -> String {
    paint(enabled, CYAN, text)
}

/// Color a label (bold).
pub fn label(text: &str, enabled: bool) -> String {
    paint(enabled, BOLD, text)
}

/// Dim secondary text such as dates.
pub fn dim(text: &str, enabled: bool) -> String {
    paint(enabled, DIM, text)
}

/// Color a number/count (bright cyan).
pub fn number(n: impl std::fmt::Display, enabled: bool) -> String {
    paint(enabled, BRIGHT_CYAN, &n.to_string())
}

/// Emoji constants for consistent usage
pub mod emoji {
    pub const CHECK: &str = "✅";
    pub const CROSS: &str = "❌";
    pub const WARNING: &str = "⚠️";
    pub const SPRINT: &str = "🏃";
    pub const TASK: &str = "📋";
    pub const LINK: &str = "🔗";
    pub const FIRE: &str = "🔥";
    pub const TEAM: &str = "👥";
    pub const CLOCK: &str = "🕐";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_colors_distinct() {
        let colors = [
            band_color(UtilizationBand::Overloaded),
            band_color(UtilizationBand::Warning),
            band_color(UtilizationBand::Healthy),
            band_color(UtilizationBand::Idle),
        ];
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_utilization_overloaded_is_red() {
        let text = utilization(125.0, true);
        assert!(text.contains(RED));
        assert!(text.contains("125%"));
        assert!(text.ends_with(RESET));
    }

    #[test]
    fn test_utilization_plain_when_disabled() {
        assert_eq!(utilization(80.4, false), "80%");
    }

    #[test]
    fn test_severity_high_bold_red() {
        let text = severity(Severity::High, true);
        assert!(text.contains(BOLD));
        assert!(text.contains(RED));
        assert!(text.contains("HIGH"));
    }

    #[test]
    fn test_severity_plain() {
        assert_eq!(severity(Severity::Medium, false), "MEDIUM");
    }

    #[test]
    fn test_label_and_number() {
        assert_eq!(label("Sprint 1", false), "Sprint 1");
        assert!(label("Sprint 1", true).contains(BOLD));
        assert_eq!(number(3, false), "3");
        assert!(number(3, true).contains(BRIGHT_CYAN));
    }
}
