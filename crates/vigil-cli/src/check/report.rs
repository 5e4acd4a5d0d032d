//! Tabular terminal report for `vigil check`.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::time::Duration;

use colored::{Color, Colorize};
use serde_json::Value;
use vigil_core::rules::{self, Priority};
use vigil_core::{HealthStatus, Status, SystemHealth};

const COMPONENT_WIDTH: usize = 20;
const STATUS_WIDTH: usize = 15;
const DETAILS_WIDTH: usize = 35;

/// Display labels keyed by probe name.
pub type Labels = HashMap<String, String>;

/// Renders the full report for one run.
pub fn render(health: &SystemHealth, labels: &Labels, elapsed: Duration) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = write_header(&mut out);
    let _ = write_score(&mut out, health);
    let _ = write_table(&mut out, health, labels);
    let _ = write_missing_features(&mut out, health);
    let _ = write_recommendations(&mut out, health);

    let _ = writeln!(
        out,
        "\n{}",
        format!("Health check completed in {}ms", elapsed.as_millis()).bright_black()
    );
    out
}

fn write_header(out: &mut String) -> std::fmt::Result {
    let width = COMPONENT_WIDTH + STATUS_WIDTH + DETAILS_WIDTH;
    let title = "SYSTEM HEALTH CHECK";

    writeln!(out, "{}", format!("╔{}╗", "═".repeat(width)).cyan())?;
    writeln!(
        out,
        "{}{}{}",
        "║".cyan(),
        format!("{:^width$}", title).bold(),
        "║".cyan()
    )?;
    writeln!(out, "{}", format!("╚{}╝", "═".repeat(width)).cyan())
}

fn write_score(out: &mut String, health: &SystemHealth) -> std::fmt::Result {
    let color = match health.health_score {
        80.. => Color::Green,
        60..=79 => Color::Yellow,
        _ => Color::Red,
    };
    let status = health.overall_status.as_ref().to_uppercase();

    writeln!(
        out,
        "\n{} {}  {}",
        "Overall Health:".bold(),
        format!("{}%", health.health_score).color(color).bold(),
        status.color(color)
    )
}

fn write_table(out: &mut String, health: &SystemHealth, labels: &Labels) -> std::fmt::Result {
    writeln!(
        out,
        "\n{:<cw$}{:<sw$}{}",
        "Component".bold(),
        "Status".bold(),
        "Details".bold(),
        cw = COMPONENT_WIDTH,
        sw = STATUS_WIDTH,
    )?;
    writeln!(
        out,
        "{}",
        "─".repeat(COMPONENT_WIDTH + STATUS_WIDTH + DETAILS_WIDTH).bright_black()
    )?;

    for component in &health.components {
        let label = labels
            .get(&component.component)
            .map_or(component.component.as_str(), String::as_str);
        let (badge, color) = badge(component.status);

        writeln!(
            out,
            "{}{}{}",
            pad(label, COMPONENT_WIDTH),
            pad(badge, STATUS_WIDTH).color(color),
            truncate(&details(component), DETAILS_WIDTH)
        )?;
    }

    Ok(())
}

fn write_missing_features(out: &mut String, health: &SystemHealth) -> std::fmt::Result {
    if health.missing_features.is_empty() {
        return writeln!(out, "\n{}", "✅ All major features implemented!".green());
    }

    writeln!(out, "\n{}", "Missing Features:".yellow().bold())?;
    for feature in &health.missing_features {
        writeln!(out, "  • {feature}")?;
    }
    Ok(())
}

fn write_recommendations(out: &mut String, health: &SystemHealth) -> std::fmt::Result {
    let recommendations = rules::by_priority(rules::recommend(&health.components));
    if recommendations.is_empty() {
        return writeln!(out, "\n{}", "✅ System is running optimally!".green());
    }

    writeln!(out, "\n{}", "Recommendations:".bold())?;
    for recommendation in recommendations {
        let (icon, color) = match recommendation.priority {
            Priority::High => ("🔴", Color::Red),
            Priority::Medium => ("🟡", Color::Yellow),
            Priority::Low => ("🟢", Color::Green),
        };
        let tag = format!("[{}]", recommendation.priority.as_ref().to_uppercase());

        writeln!(
            out,
            "  {} {} {}",
            icon,
            tag.color(color).bold(),
            recommendation.message
        )?;
    }
    Ok(())
}

fn badge(status: Status) -> (&'static str, Color) {
    match status {
        Status::Healthy => ("✅ Healthy", Color::Green),
        Status::Degraded => ("⚠️ Degraded", Color::Yellow),
        Status::Unhealthy => ("❌ Unhealthy", Color::Red),
        Status::Unknown => ("❔ Unknown", Color::BrightBlack),
    }
}

fn count(status: &HealthStatus, key: &str) -> u64 {
    status.detail(key).and_then(Value::as_u64).unwrap_or_default()
}

fn first_error(status: &HealthStatus) -> Option<&str> {
    status.error_list().first().map(String::as_str)
}

/// One-line summary of a component's details.
pub(crate) fn details(status: &HealthStatus) -> String {
    match status.component.as_str() {
        "api" => format!(
            "{}/{} endpoints healthy",
            count(status, "healthyCount"),
            count(status, "totalCount")
        ),
        "database" => match status.detail("tables").and_then(Value::as_object) {
            Some(tables) => tables
                .iter()
                .map(|(table, rows)| format!("{table}: {}", rows.as_u64().unwrap_or_default()))
                .collect::<Vec<_>>()
                .join(", "),
            None => first_error(status).unwrap_or("Not connected").to_owned(),
        },
        "websocket" => match status.status {
            Status::Healthy => "Connected".to_owned(),
            _ => first_error(status).unwrap_or("Not available").to_owned(),
        },
        "frontend" => match status.detail("missingCount").and_then(Value::as_u64) {
            Some(0) => "All components present".to_owned(),
            _ => "Some components missing".to_owned(),
        },
        "bots" => match status.status {
            Status::Healthy => "Fully operational",
            Status::Degraded => "Partially operational",
            _ => "Not running",
        }
        .to_owned(),
        "audio" => match status.status {
            Status::Healthy => "Running",
            _ => "Not running",
        }
        .to_owned(),
        "docker" => match status.detail_bool("engineAvailable") {
            Some(false) | None => "Docker not available".to_owned(),
            Some(true) => format!(
                "{}/{} containers running",
                count(status, "runningCount"),
                count(status, "expectedCount")
            ),
        },
        "integrations" => format!(
            "{}/{} configured",
            count(status, "configuredCount"),
            count(status, "totalCount")
        ),
        _ => first_error(status)
            .map_or_else(|| status.status.as_ref().to_owned(), ToOwned::to_owned),
    }
}

/// Terminal columns taken by `text`.
///
/// Emoji take two columns and variation selectors none. Everything else in
/// the report is single-width.
fn display_width(text: &str) -> usize {
    text.chars()
        .map(|c| match c {
            '\u{200D}' | '\u{FE00}'..='\u{FE0F}' => 0,
            '\u{2600}'..='\u{27BF}' | '\u{1F000}'..='\u{1FAFF}' => 2,
            _ => 1,
        })
        .sum()
}

fn pad(text: &str, width: usize) -> String {
    let len = display_width(text);
    format!("{text}{}", " ".repeat(width.saturating_sub(len)))
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_owned();
    }

    let head: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{head}...")
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use serde_json::json;
    use vigil_core::{OverallStatus, scoring};

    use super::*;

    #[test]
    fn badges_pad_to_the_same_columns() {
        for status in [Status::Healthy, Status::Degraded, Status::Unhealthy, Status::Unknown] {
            let (badge, _) = badge(status);
            let padded = pad(badge, STATUS_WIDTH);
            assert_eq!(display_width(&padded), STATUS_WIDTH, "{badge}");
        }

        assert_eq!(display_width("⚠️ Degraded"), 11);
        assert_eq!(display_width("✅ Healthy"), 10);
        assert_eq!(pad("Component", 12), "Component   ");
    }

    #[test]
    fn api_details_count_endpoints() {
        let status = HealthStatus::degraded("api")
            .with_detail("healthyCount", 2)
            .with_detail("totalCount", 3);
        assert_eq!(details(&status), "2/3 endpoints healthy");
    }

    #[test]
    fn database_details_list_tables_or_error() {
        let connected = HealthStatus::healthy("database")
            .with_detail("connected", true)
            .with_detail("tables", json!({"User": 12, "Lead": 3}));
        assert_eq!(details(&connected), "Lead: 3, User: 12");

        let failed = HealthStatus::unhealthy("database", "connection refused");
        assert_eq!(details(&failed), "connection refused");
    }

    #[test]
    fn docker_details_distinguish_missing_engine() {
        let missing = HealthStatus::unknown("docker").with_detail("engineAvailable", false);
        assert_eq!(details(&missing), "Docker not available");

        let running = HealthStatus::degraded("docker")
            .with_detail("engineAvailable", true)
            .with_detail("runningCount", 1)
            .with_detail("expectedCount", 2);
        assert_eq!(details(&running), "1/2 containers running");
    }

    #[test]
    fn status_driven_details() {
        assert_eq!(details(&HealthStatus::healthy("websocket")), "Connected");
        assert_eq!(details(&HealthStatus::unknown("websocket")), "Not available");
        assert_eq!(details(&HealthStatus::degraded("bots")), "Partially operational");
        assert_eq!(details(&HealthStatus::unhealthy("bots", "down")), "Not running");
        assert_eq!(details(&HealthStatus::healthy("audio")), "Running");
        assert_eq!(
            details(&HealthStatus::healthy("frontend").with_detail("missingCount", 0)),
            "All components present"
        );
        assert_eq!(
            details(
                &HealthStatus::degraded("integrations")
                    .with_detail("configuredCount", 1)
                    .with_detail("totalCount", 7)
            ),
            "1/7 configured"
        );
    }

    #[test]
    fn unknown_component_falls_back_to_error() {
        let status = HealthStatus::unhealthy("queue", "Connection timeout");
        assert_eq!(details(&status), "Connection timeout");
        assert_eq!(details(&HealthStatus::healthy("queue")), "healthy");
    }

    #[test]
    fn long_details_are_truncated() {
        let text = "x".repeat(50);
        let truncated = truncate(&text, DETAILS_WIDTH);
        assert_eq!(truncated.chars().count(), DETAILS_WIDTH);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn healthy_run_reports_nothing_to_do() {
        let health = scoring::score(vec![
            HealthStatus::healthy("api"),
            HealthStatus::healthy("audio"),
        ]);
        let mut labels = Labels::new();
        labels.insert("api".to_owned(), "API Endpoints".to_owned());

        let report = render(&health, &labels, Duration::from_millis(42));
        assert!(report.contains("SYSTEM HEALTH CHECK"));
        assert!(report.contains("API Endpoints"));
        assert!(report.contains("All major features implemented!"));
        assert!(report.contains("System is running optimally!"));
        assert!(report.contains("Health check completed in 42ms"));
    }

    #[test]
    fn failing_run_lists_features_and_priorities() {
        let health = SystemHealth {
            overall_status: OverallStatus::Unhealthy,
            health_score: 0,
            components: vec![
                HealthStatus::unhealthy("websocket", "refused"),
                HealthStatus::degraded("docker").with_detail("engineAvailable", true),
            ],
            missing_features: vec!["Real-time WebSocket communication".to_owned()],
            recommendations: Vec::new(),
            timestamp: Timestamp::now(),
        };

        let report = render(&health, &Labels::new(), Duration::ZERO);
        assert!(report.contains("Real-time WebSocket communication"));
        assert!(report.contains("Critical: Fix websocket - refused"));
        assert!(report.contains("Warning: Optimize docker performance"));
        assert!(report.contains("[HIGH]"));
        assert!(report.contains("[MEDIUM]"));

        let high = report.find("Critical: Fix websocket").unwrap_or_default();
        let medium = report.find("Warning: Optimize docker").unwrap_or_default();
        assert!(high < medium);
    }
}
