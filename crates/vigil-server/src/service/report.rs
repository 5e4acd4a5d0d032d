//! Console side-channel report for comprehensive runs.

use std::fmt::Write as _;

use colored::{Color, Colorize};
use tokio::io::AsyncWriteExt;
use vigil_core::{Status, SystemHealth};

/// Tracing target for console reporting.
const TRACING_TARGET: &str = "vigil_server::service::report";

/// Prints a colored summary of each comprehensive run to stdout.
///
/// Rendering and writing happen on a spawned task so the HTTP response is
/// never held back by a slow terminal.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleReporter {
    enabled: bool,
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ConsoleReporter {
    /// Creates a reporter; a disabled reporter drops every report.
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Returns a reporter that never prints.
    pub fn disabled() -> Self {
        Self::new(false)
    }

    /// Returns whether reports are printed.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Schedules the report for `health` on a background task.
    pub fn spawn(&self, health: SystemHealth) {
        if !self.enabled {
            return;
        }

        tokio::spawn(async move {
            let report = render(&health);
            let mut stdout = tokio::io::stdout();
            let written = match stdout.write_all(report.as_bytes()).await {
                Ok(()) => stdout.flush().await,
                Err(error) => Err(error),
            };

            if let Err(error) = written {
                tracing::warn!(
                    target: TRACING_TARGET,
                    error = %error,
                    "Failed to write console report"
                );
            }
        });
    }
}

/// Color band for a health score.
pub(crate) fn score_color(score: u8) -> Color {
    match score {
        80.. => Color::Green,
        60..=79 => Color::Yellow,
        _ => Color::Red,
    }
}

fn status_style(status: Status) -> (&'static str, Color) {
    match status {
        Status::Healthy => ("✅", Color::Green),
        Status::Degraded => ("⚠️", Color::Yellow),
        Status::Unhealthy => ("❌", Color::Red),
        Status::Unknown => ("❔", Color::BrightBlack),
    }
}

/// Renders the report text for one run.
pub fn render(health: &SystemHealth) -> String {
    let divider = "═".repeat(60);
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "\n{}", divider.cyan().bold());
    let _ = writeln!(out, "{}", "     COMPREHENSIVE HEALTH CHECK REPORT".cyan().bold());
    let _ = writeln!(out, "{}", divider.cyan().bold());

    let score = format!("{}%", health.health_score).color(score_color(health.health_score));
    let _ = writeln!(out, "\n{} {}", "📊 Overall Health Score:".bold(), score);

    let _ = writeln!(out, "\n{}", "🔍 Component Status:".bold());
    for component in &health.components {
        let (glyph, color) = status_style(component.status);
        let status = component.status.as_ref().to_uppercase().color(color);
        let _ = writeln!(out, "  {} {}: {}", glyph, component.component.bold(), status);

        if let Some(latency) = component.latency_ms {
            let _ = writeln!(out, "     Latency: {}ms", latency);
        }

        for error in component.error_list() {
            let _ = writeln!(out, "     {}", format!("Error: {error}").red());
        }
    }

    if !health.missing_features.is_empty() {
        let _ = writeln!(out, "\n{}", "🔧 Missing Features:".bold());
        for feature in &health.missing_features {
            let _ = writeln!(out, "  {}", format!("• {feature}").yellow());
        }
    }

    if !health.recommendations.is_empty() {
        let _ = writeln!(out, "\n{}", "💡 Recommendations:".bold());
        for recommendation in &health.recommendations {
            let line = if recommendation.starts_with("Critical:") {
                format!("⚠️ {recommendation}").red()
            } else if recommendation.starts_with("Warning:") {
                format!("⚠️ {recommendation}").yellow()
            } else {
                format!("• {recommendation}").cyan()
            };
            let _ = writeln!(out, "  {}", line);
        }
    }

    let _ = writeln!(out, "\n{}\n", divider.cyan().bold());
    out
}

#[cfg(test)]
mod tests {
    use vigil_core::HealthStatus;
    use vigil_core::scoring::score;

    use super::*;

    #[test]
    fn score_bands() {
        assert_eq!(score_color(100), Color::Green);
        assert_eq!(score_color(80), Color::Green);
        assert_eq!(score_color(79), Color::Yellow);
        assert_eq!(score_color(60), Color::Yellow);
        assert_eq!(score_color(59), Color::Red);
        assert_eq!(score_color(0), Color::Red);
    }

    #[test]
    fn render_lists_components_errors_and_recommendations() {
        let health = score(vec![
            HealthStatus::degraded("api").with_latency(std::time::Duration::from_millis(12)),
            HealthStatus::unhealthy("database", "connection refused"),
        ]);

        let report = render(&health);
        assert!(report.contains("COMPREHENSIVE HEALTH CHECK REPORT"));
        assert!(report.contains("25%"));
        assert!(report.contains("api"));
        assert!(report.contains("DEGRADED"));
        assert!(report.contains("Latency: 12ms"));
        assert!(report.contains("Error: connection refused"));
        assert!(report.contains("Critical: Fix database - connection refused"));
        assert!(report.contains("Warning: Optimize api performance"));
    }

    #[test]
    fn render_skips_empty_sections() {
        let health = score(vec![HealthStatus::healthy("api")]);

        let report = render(&health);
        assert!(report.contains("100%"));
        assert!(!report.contains("Missing Features"));
        assert!(!report.contains("Recommendations"));
    }

    #[test]
    fn disabled_reporter_does_not_spawn() {
        // No runtime is entered, so spawning would panic.
        ConsoleReporter::disabled().spawn(score(Vec::new()));
    }
}
