//! End-to-end dashboard builds against report directories on disk.

use chrono::{TimeZone, Utc};
use lab_dashboard::{build_dashboard, build_dashboard_at, DashboardError};
use serde_json::json;
use std::fs;
use std::path::Path;

fn write_report(dir: &Path, name: &str, value: &serde_json::Value) {
    fs::write(dir.join(name), serde_json::to_string_pretty(value).unwrap()).unwrap();
}

fn performance_report() -> serde_json::Value {
    json!({
        "timestamp": "2024-03-01T08:00:00",
        "lab_operations": {
            "tat_compliance": {"current": 88.5, "target": 90.0, "samples_processed": 1250, "average_tat_minutes": 47},
            "qc_performance": {"pass_rate": 98.7, "failures": 16},
            "staff_efficiency": {"utilization": 82.3, "staff_count": 28},
            "sample_volume": {"daily_average": 1250}
        },
        "workflow_efficiency": {
            "automation_rate": {"current": 72.5, "target": 80.0},
            "pipeline_performance": {"github_actions_success_rate": 94.2, "failed_runs_this_week": 3},
            "integration_health": {"notion_sync_success": 99.1, "teams_notifications_sent": 245, "powerbi_updates_pushed": 1820},
            "data_quality": {"validation_pass_rate": 98.9}
        },
        "bottlenecks": [
            {"area": "TAT Compliance", "severity": "high", "impact": "Patient care delays", "current_value": 88.5, "target_value": 90.0},
            {"area": "Automation Rate", "severity": "medium", "impact": "Manual process overhead", "current_value": 72.5, "target_value": 80.0}
        ],
        "performance_score": {"overall": 96.3, "grade": "A+", "tat_compliance": 98.3, "qc_performance": 100, "system_availability": 99.95, "automation": 90.6}
    })
}

#[test]
fn builds_with_no_reports() {
    let reports = tempfile::tempdir().unwrap();
    let out_dir = tempfile::tempdir().unwrap();
    let output = out_dir.path().join("dashboard.html");

    let summary = build_dashboard(reports.path(), &output).unwrap();
    assert_eq!(summary.reports_loaded, 0);
    assert_eq!(summary.alert_count, 0);

    let html = fs::read_to_string(&output).unwrap();
    assert_eq!(html.len(), summary.bytes_written);
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("</html>"));
    assert!(html.contains("No health data available"));
    assert!(html.contains("No active alerts"));
    assert!(html.contains(r#"<span class="badge">N/A</span>"#));
}

#[test]
fn partial_health_report_keeps_present_fields() {
    let reports = tempfile::tempdir().unwrap();
    write_report(reports.path(), "health_report.json", &json!({"status": "degraded"}));
    let output = reports.path().join("dashboard.html");

    let summary = build_dashboard(reports.path(), &output).unwrap();
    assert_eq!(summary.reports_loaded, 1);

    let html = fs::read_to_string(&output).unwrap();
    assert!(html.contains(r#"<span class="badge degraded">degraded</span>"#));
    assert!(html.contains("No health data available"));
}

#[test]
fn full_reports_render_every_section() {
    let reports = tempfile::tempdir().unwrap();
    write_report(
        reports.path(),
        "health_report.json",
        &json!({
            "status": "healthy",
            "timestamp": "2024-03-01T07:55:00",
            "metrics": {"cpu_percent": 45.6, "memory_percent": 62.3, "disk_percent": 40, "uptime_hours": 720, "error_rate": 0.8},
            "services": [{"name": "notion-sync", "status": "up"}]
        }),
    );
    write_report(
        reports.path(),
        "repo_analysis.json",
        &json!({
            "timestamp": "2024-03-01T06:00:00",
            "repositories": [{"name": "lis-bridge", "status": "healthy", "health_score": 92}],
            "summary": {"total_repositories": 1},
            "recommendations": []
        }),
    );
    write_report(reports.path(), "performance_analysis.json", &performance_report());
    let output = reports.path().join("dashboard.html");

    let summary = build_dashboard(reports.path(), &output).unwrap();
    assert_eq!(summary.reports_loaded, 3);
    assert_eq!(summary.alert_count, 2);

    let html = fs::read_to_string(&output).unwrap();
    assert!(html.contains("45.6%"));
    assert!(html.contains("notion-sync"));
    assert!(html.contains("lis-bridge"));
    assert!(html.contains("TAT Compliance: 88.5 (target: 90.0)"));
    assert!(html.contains("Automation Rate: 72.5 (target: 80.0)"));
    assert!(html.contains("96.3%"));
    assert!(html.contains("A+"));
    assert!(html.contains("72.5% (target 80%)"));
    assert!(!html.contains("No health data available"));
}

#[test]
fn rebuild_is_identical_except_timestamp() {
    let reports = tempfile::tempdir().unwrap();
    write_report(reports.path(), "performance_analysis.json", &performance_report());
    let first = reports.path().join("first.html");
    let second = reports.path().join("second.html");
    let third = reports.path().join("third.html");

    let t1 = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    let t2 = Utc.with_ymd_and_hms(2024, 3, 1, 12, 1, 0).unwrap();
    build_dashboard_at(reports.path(), &first, t1).unwrap();
    build_dashboard_at(reports.path(), &second, t1).unwrap();
    build_dashboard_at(reports.path(), &third, t2).unwrap();

    let first = fs::read_to_string(first).unwrap();
    let second = fs::read_to_string(second).unwrap();
    let third = fs::read_to_string(third).unwrap();

    assert_eq!(first, second);
    assert_ne!(first, third);
    assert_eq!(
        first,
        third.replace("2024-03-01 12:01:00 UTC", "2024-03-01 12:00:00 UTC")
    );
}

#[test]
fn unwritable_output_is_an_error() {
    let reports = tempfile::tempdir().unwrap();
    let output = reports.path().join("missing-dir").join("dashboard.html");

    let err = build_dashboard(reports.path(), &output).unwrap_err();
    assert!(matches!(err, DashboardError::Write { .. }));
    assert!(err.to_string().contains("missing-dir"));
}
