//! Output formatting helpers for CLI commands

use crate::monitor::{AlertSeverity, HealthRecord, OverallHealth, SystemStatus, TargetStatus};
use colored::{ColoredString, Colorize};
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use std::fmt::Write;

/// Get status icon for a target status
pub fn status_icon(status: TargetStatus) -> &'static str {
    if status.is_nominal() {
        "✓"
    } else if status.is_failed() {
        "✗"
    } else {
        "~"
    }
}

fn colored_status(status: TargetStatus) -> ColoredString {
    let text = format!("{} {}", status_icon(status), status);
    if status.is_nominal() {
        text.green()
    } else if status.is_failed() {
        text.red()
    } else {
        text.yellow()
    }
}

fn colored_overall(overall: OverallHealth) -> ColoredString {
    let text = overall.as_str().to_uppercase();
    match overall {
        OverallHealth::Excellent => text.green().bold(),
        OverallHealth::Good => text.green(),
        OverallHealth::Fair => text.yellow(),
        OverallHealth::Poor => text.red().bold(),
    }
}

fn colored_severity(severity: AlertSeverity) -> ColoredString {
    let text = severity.as_str().to_uppercase();
    match severity {
        AlertSeverity::Critical => text.red().bold(),
        AlertSeverity::High => text.red(),
        AlertSeverity::Medium => text.yellow(),
        AlertSeverity::Low => text.cyan(),
    }
}

/// Format target records as a table
pub fn format_targets_table(records: &[HealthRecord]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Target",
        "Type",
        "Status",
        "Latency",
        "Error Rate",
        "Availability",
        "Uptime",
        "Last Error",
    ]);

    for r in records {
        table.add_row(vec![
            Cell::new(&r.target_id),
            Cell::new(r.kind),
            Cell::new(colored_status(r.status)),
            Cell::new(format!("{}ms", r.response_time_ms)),
            Cell::new(format!("{:.1}%", r.error_rate * 100.0)),
            Cell::new(format!("{:.1}%", r.availability_pct)),
            Cell::new(format!("{:.1}%", r.uptime_pct)),
            Cell::new(r.last_error.as_deref().unwrap_or("-")),
        ]);
    }

    table.to_string()
}

/// Format a snapshot as human-readable text
pub fn format_status_pretty(status: &SystemStatus) -> String {
    let mut output = String::new();

    let _ = writeln!(
        output,
        "Overall: {} ({}/{} nominal)",
        colored_overall(status.overall),
        status.nominal_count(),
        status.targets.len()
    );
    let _ = writeln!(output, "Checked: {}", status.timestamp.to_rfc3339());

    if !status.targets.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "{}", format_targets_table(&status.targets));
    }

    if !status.alerts.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "Alerts:");
        for alert in &status.alerts {
            let _ = writeln!(
                output,
                "  [{}] {}: {}",
                colored_severity(alert.severity),
                alert.component,
                alert.message
            );
        }
    }

    if !status.recommendations.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "Recommendations:");
        for recommendation in &status.recommendations {
            let _ = writeln!(output, "  - {}", recommendation);
        }
    }

    output
}

/// Format a snapshot as JSON
pub fn format_status_json(status: &SystemStatus) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::{Alert, AlertThresholds, TargetKind};
    use chrono::Utc;

    fn sample_status() -> SystemStatus {
        let now = Utc::now();
        let healthy = HealthRecord::new("database", TargetKind::Service, now);
        let mut failing = HealthRecord::new("gpt-4o", TargetKind::Model, now);
        failing.status = TargetStatus::Error;
        failing.error_rate = 0.2;
        failing.last_error = Some("connection failed: refused".to_string());

        let alert = Alert::new(
            "gpt-4o",
            AlertSeverity::High,
            "Model gpt-4o is error: connection failed: refused",
            now,
        );
        SystemStatus::build(
            vec![healthy, failing],
            vec![alert],
            &AlertThresholds::default(),
            now,
        )
    }

    #[test]
    fn test_status_icon() {
        assert_eq!(status_icon(TargetStatus::Active), "✓");
        assert_eq!(status_icon(TargetStatus::Healthy), "✓");
        assert_eq!(status_icon(TargetStatus::Warning), "~");
        assert_eq!(status_icon(TargetStatus::Critical), "✗");
    }

    #[test]
    fn test_format_targets_table() {
        let status = sample_status();
        let output = format_targets_table(&status.targets);
        assert!(output.contains("database"));
        assert!(output.contains("gpt-4o"));
        assert!(output.contains("20.0%"));
        assert!(output.contains("connection failed: refused"));
    }

    #[test]
    fn test_format_status_pretty_sections() {
        let status = sample_status();
        let output = format_status_pretty(&status);
        assert!(output.contains("Overall:"));
        assert!(output.contains("(1/2 nominal)"));
        assert!(output.contains("Alerts:"));
        assert!(output.contains("Recommendations:"));
        assert!(output.contains("elevated error rates: gpt-4o"));
    }

    #[test]
    fn test_format_status_pretty_empty_fleet() {
        let status = SystemStatus::build(vec![], vec![], &AlertThresholds::default(), Utc::now());
        let output = format_status_pretty(&status);
        assert!(output.contains("(0/0 nominal)"));
        assert!(!output.contains("Alerts:"));
        assert!(!output.contains("Recommendations:"));
    }

    #[test]
    fn test_format_status_json() {
        let status = sample_status();
        let output = format_status_json(&status).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["overall"], "poor");
        assert_eq!(parsed["targets"][1]["status"], "error");
        assert_eq!(parsed["alerts"][0]["severity"], "high");
    }
}
