//! Dashboard view model.
//!
//! [`DashboardView::build`] picks named paths out of the report documents and
//! substitutes a default for every individual field that is absent or has the
//! wrong JSON type. Numbers default to `0`, text to `"unknown"` or `"N/A"`,
//! lists to empty. The result is immutable and fully owned; rendering never
//! touches the raw documents.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::reports::ReportSet;

/// Default for status-like text fields.
pub const UNKNOWN: &str = "unknown";

/// Default for descriptive text fields.
pub const NOT_AVAILABLE: &str = "N/A";

/// The flat, default-filled structure rendered into HTML.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    /// Render time, the only field that varies between identical inputs.
    pub generated_at: String,
    pub system_health: SystemHealth,
    pub performance: PerformanceMetrics,
    pub repositories: RepositoryStatus,
    pub alerts: Vec<AlertView>,
    pub lab_operations: LabOperations,
    pub workflow: WorkflowMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemHealth {
    pub status: String,
    /// CSS-safe form of `status`.
    pub status_class: String,
    pub checked_at: String,
    /// `None` renders the "no health data" placeholder.
    pub metrics: Option<HealthMetrics>,
    pub services: Vec<ServiceStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthMetrics {
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub disk_percent: f64,
    pub uptime_hours: f64,
    pub error_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceStatus {
    pub name: String,
    pub status: String,
    pub status_class: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceMetrics {
    pub overall_score: f64,
    pub grade: String,
    pub tat_compliance: f64,
    pub qc_performance: f64,
    pub system_availability: f64,
    pub automation: f64,
    pub analyzed_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepositoryStatus {
    pub total_repositories: f64,
    pub analyzed_at: String,
    pub repositories: Vec<RepositoryRow>,
    pub recommendation_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepositoryRow {
    pub name: String,
    pub status: String,
    pub status_class: String,
    pub health_score: f64,
}

/// An active alert, derived from one performance bottleneck.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertView {
    pub severity: String,
    pub severity_class: String,
    pub area: String,
    pub message: String,
    pub impact: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabOperations {
    pub tat_compliance: f64,
    pub tat_target: f64,
    pub samples_processed: f64,
    pub average_tat_minutes: f64,
    pub qc_pass_rate: f64,
    pub qc_failures: f64,
    pub staff_utilization: f64,
    pub staff_count: f64,
    pub daily_sample_volume: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowMetrics {
    pub automation_rate: f64,
    pub automation_target: f64,
    pub pipeline_success_rate: f64,
    pub failed_runs_this_week: f64,
    pub notion_sync_success: f64,
    pub teams_notifications_sent: f64,
    pub powerbi_updates_pushed: f64,
    pub validation_pass_rate: f64,
}

impl DashboardView {
    /// Assemble the view model from whatever reports are available.
    #[must_use]
    pub fn build(reports: &ReportSet, generated_at: DateTime<Utc>) -> Self {
        let health = reports.health.as_ref();
        let repo = reports.repository.as_ref();
        let perf = reports.performance.as_ref();

        Self {
            generated_at: generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            system_health: SystemHealth::from_report(health),
            performance: PerformanceMetrics::from_report(perf),
            repositories: RepositoryStatus::from_report(repo),
            alerts: list(perf, &["bottlenecks"])
                .iter()
                .map(AlertView::from_bottleneck)
                .collect(),
            lab_operations: LabOperations::from_report(perf),
            workflow: WorkflowMetrics::from_report(perf),
        }
    }
}

impl SystemHealth {
    fn from_report(doc: Option<&Value>) -> Self {
        let status = text(doc, &["status"], UNKNOWN);
        let metrics = lookup(doc, &["metrics"])
            .filter(|m| m.is_object())
            .map(|m| HealthMetrics {
                cpu_percent: number(Some(m), &["cpu_percent"]),
                memory_percent: number(Some(m), &["memory_percent"]),
                disk_percent: number(Some(m), &["disk_percent"]),
                uptime_hours: number(Some(m), &["uptime_hours"]),
                error_rate: number(Some(m), &["error_rate"]),
            });
        let services = list(doc, &["services"])
            .iter()
            .map(|s| {
                let status = text(Some(s), &["status"], UNKNOWN);
                ServiceStatus {
                    name: text(Some(s), &["name"], UNKNOWN),
                    status_class: css_class(&status),
                    status,
                }
            })
            .collect();

        Self {
            status_class: css_class(&status),
            status,
            checked_at: text(doc, &["timestamp"], NOT_AVAILABLE),
            metrics,
            services,
        }
    }
}

impl PerformanceMetrics {
    fn from_report(doc: Option<&Value>) -> Self {
        Self {
            overall_score: number(doc, &["performance_score", "overall"]),
            grade: text(doc, &["performance_score", "grade"], NOT_AVAILABLE),
            tat_compliance: number(doc, &["performance_score", "tat_compliance"]),
            qc_performance: number(doc, &["performance_score", "qc_performance"]),
            system_availability: number(doc, &["performance_score", "system_availability"]),
            automation: number(doc, &["performance_score", "automation"]),
            analyzed_at: text(doc, &["timestamp"], NOT_AVAILABLE),
        }
    }
}

impl RepositoryStatus {
    fn from_report(doc: Option<&Value>) -> Self {
        Self {
            total_repositories: number(doc, &["summary", "total_repositories"]),
            analyzed_at: text(doc, &["timestamp"], NOT_AVAILABLE),
            repositories: list(doc, &["repositories"])
                .iter()
                .map(|r| {
                    let status = text(Some(r), &["status"], UNKNOWN);
                    RepositoryRow {
                        name: text(Some(r), &["name"], UNKNOWN),
                        status_class: css_class(&status),
                        status,
                        health_score: number(Some(r), &["health_score"]),
                    }
                })
                .collect(),
            recommendation_count: list(doc, &["recommendations"]).len(),
        }
    }
}

impl AlertView {
    fn from_bottleneck(item: &Value) -> Self {
        let doc = Some(item);
        let severity = text(doc, &["severity"], UNKNOWN);
        let area = text(doc, &["area"], UNKNOWN);
        let message = lookup(doc, &["message"])
            .and_then(Value::as_str)
            .map_or_else(
                || {
                    format!(
                        "{area}: {:.1} (target: {:.1})",
                        number(doc, &["current_value"]),
                        number(doc, &["target_value"])
                    )
                },
                String::from,
            );

        Self {
            severity_class: css_class(&severity),
            severity,
            area,
            message,
            impact: text(doc, &["impact"], NOT_AVAILABLE),
        }
    }
}

impl LabOperations {
    fn from_report(doc: Option<&Value>) -> Self {
        let ops = lookup(doc, &["lab_operations"]);
        Self {
            tat_compliance: number(ops, &["tat_compliance", "current"]),
            tat_target: number(ops, &["tat_compliance", "target"]),
            samples_processed: number(ops, &["tat_compliance", "samples_processed"]),
            average_tat_minutes: number(ops, &["tat_compliance", "average_tat_minutes"]),
            qc_pass_rate: number(ops, &["qc_performance", "pass_rate"]),
            qc_failures: number(ops, &["qc_performance", "failures"]),
            staff_utilization: number(ops, &["staff_efficiency", "utilization"]),
            staff_count: number(ops, &["staff_efficiency", "staff_count"]),
            daily_sample_volume: number(ops, &["sample_volume", "daily_average"]),
        }
    }
}

impl WorkflowMetrics {
    fn from_report(doc: Option<&Value>) -> Self {
        let wf = lookup(doc, &["workflow_efficiency"]);
        Self {
            automation_rate: number(wf, &["automation_rate", "current"]),
            automation_target: number(wf, &["automation_rate", "target"]),
            pipeline_success_rate: number(
                wf,
                &["pipeline_performance", "github_actions_success_rate"],
            ),
            failed_runs_this_week: number(wf, &["pipeline_performance", "failed_runs_this_week"]),
            notion_sync_success: number(wf, &["integration_health", "notion_sync_success"]),
            teams_notifications_sent: number(
                wf,
                &["integration_health", "teams_notifications_sent"],
            ),
            powerbi_updates_pushed: number(wf, &["integration_health", "powerbi_updates_pushed"]),
            validation_pass_rate: number(wf, &["data_quality", "validation_pass_rate"]),
        }
    }
}

// =============================================================================
// Field access
// =============================================================================

fn lookup<'a>(doc: Option<&'a Value>, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(doc?, |value, key| value.get(key))
}

fn number(doc: Option<&Value>, path: &[&str]) -> f64 {
    lookup(doc, path).and_then(Value::as_f64).unwrap_or(0.0)
}

fn text(doc: Option<&Value>, path: &[&str], default: &str) -> String {
    lookup(doc, path)
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}

fn list<'a>(doc: Option<&'a Value>, path: &[&str]) -> &'a [Value] {
    lookup(doc, path)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Lowercase, `[a-z0-9-]` only; anything else becomes `-`.
fn css_class(raw: &str) -> String {
    let class: String = raw
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();

    if class.is_empty() {
        UNKNOWN.to_string()
    } else {
        class
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_all_reports_absent_uses_defaults() {
        let view = DashboardView::build(&ReportSet::default(), at());

        assert_eq!(view.generated_at, "2024-03-01 12:00:00 UTC");
        assert_eq!(view.system_health.status, "unknown");
        assert_eq!(view.system_health.checked_at, "N/A");
        assert!(view.system_health.metrics.is_none());
        assert!(view.system_health.services.is_empty());
        assert!(view.alerts.is_empty());
        assert_eq!(view.performance.grade, "N/A");
        assert!(view.performance.overall_score.abs() < f64::EPSILON);
        assert!(view.repositories.total_repositories.abs() < f64::EPSILON);
        assert_eq!(view.repositories.recommendation_count, 0);
        assert!(view.lab_operations.tat_compliance.abs() < f64::EPSILON);
        assert!(view.workflow.automation_rate.abs() < f64::EPSILON);
    }

    #[test]
    fn test_partial_health_report() {
        let reports = ReportSet {
            health: Some(json!({"status": "degraded"})),
            ..ReportSet::default()
        };
        let view = DashboardView::build(&reports, at());

        assert_eq!(view.system_health.status, "degraded");
        assert_eq!(view.system_health.status_class, "degraded");
        assert!(view.system_health.metrics.is_none());
    }

    #[test]
    fn test_partial_metrics_default_per_field() {
        let reports = ReportSet {
            health: Some(json!({"metrics": {"cpu_percent": 41.5, "memory_percent": "high"}})),
            ..ReportSet::default()
        };
        let metrics = DashboardView::build(&reports, at())
            .system_health
            .metrics
            .unwrap();

        assert!((metrics.cpu_percent - 41.5).abs() < f64::EPSILON);
        // Wrong type falls back like a missing field.
        assert!(metrics.memory_percent.abs() < f64::EPSILON);
        assert!(metrics.disk_percent.abs() < f64::EPSILON);
    }

    #[test]
    fn test_bottlenecks_become_alerts() {
        let reports = ReportSet {
            performance: Some(json!({
                "bottlenecks": [
                    {
                        "area": "TAT Compliance",
                        "severity": "high",
                        "impact": "Patient care delays",
                        "current_value": 88.5,
                        "target_value": 90.0
                    },
                    {"message": "Scanner offline"},
                    "not an object"
                ]
            })),
            ..ReportSet::default()
        };
        let alerts = DashboardView::build(&reports, at()).alerts;

        assert_eq!(alerts.len(), 3);
        assert_eq!(
            alerts[0],
            AlertView {
                severity: "high".to_string(),
                severity_class: "high".to_string(),
                area: "TAT Compliance".to_string(),
                message: "TAT Compliance: 88.5 (target: 90.0)".to_string(),
                impact: "Patient care delays".to_string(),
            }
        );
        assert_eq!(alerts[1].message, "Scanner offline");
        assert_eq!(alerts[1].severity, "unknown");
        assert_eq!(alerts[1].impact, "N/A");
        assert_eq!(alerts[2].message, "unknown: 0.0 (target: 0.0)");
    }

    #[test]
    fn test_alert_message_keeps_one_decimal() {
        let reports = ReportSet {
            performance: Some(json!({
                "bottlenecks": [
                    {"area": "Average TAT", "current_value": 47, "target_value": 45.04}
                ]
            })),
            ..ReportSet::default()
        };
        let alerts = DashboardView::build(&reports, at()).alerts;

        assert_eq!(alerts[0].message, "Average TAT: 47.0 (target: 45.0)");
    }

    #[test]
    fn test_performance_sections() {
        let reports = ReportSet {
            performance: Some(json!({
                "performance_score": {"overall": 95.1, "grade": "A+"},
                "lab_operations": {
                    "tat_compliance": {"current": 88.5, "samples_processed": 1250},
                    "staff_efficiency": {"staff_count": 28}
                },
                "workflow_efficiency": {
                    "integration_health": {"teams_notifications_sent": 245}
                }
            })),
            ..ReportSet::default()
        };
        let view = DashboardView::build(&reports, at());

        assert_eq!(view.performance.grade, "A+");
        assert!((view.performance.overall_score - 95.1).abs() < f64::EPSILON);
        assert!(view.performance.automation.abs() < f64::EPSILON);
        assert!((view.lab_operations.samples_processed - 1250.0).abs() < f64::EPSILON);
        assert!(view.lab_operations.qc_pass_rate.abs() < f64::EPSILON);
        assert!((view.lab_operations.staff_count - 28.0).abs() < f64::EPSILON);
        assert!((view.workflow.teams_notifications_sent - 245.0).abs() < f64::EPSILON);
        assert!(view.workflow.pipeline_success_rate.abs() < f64::EPSILON);
    }

    #[test]
    fn test_repository_section() {
        let reports = ReportSet {
            repository: Some(json!({
                "summary": {"total_repositories": 4},
                "repositories": [{"name": "lis-bridge", "status": "Needs Attention"}, {}],
                "recommendations": ["a", "b"]
            })),
            ..ReportSet::default()
        };
        let repos = DashboardView::build(&reports, at()).repositories;

        assert!((repos.total_repositories - 4.0).abs() < f64::EPSILON);
        assert_eq!(repos.recommendation_count, 2);
        assert_eq!(repos.repositories[0].name, "lis-bridge");
        assert_eq!(repos.repositories[0].status_class, "needs-attention");
        assert_eq!(repos.repositories[1].name, "unknown");
        assert_eq!(repos.analyzed_at, "N/A");
    }

    #[test]
    fn test_non_object_report_is_tolerated() {
        let reports = ReportSet {
            health: Some(json!([1, 2, 3])),
            performance: Some(json!("oops")),
            repository: Some(Value::Null),
        };
        let view = DashboardView::build(&reports, at());
        assert_eq!(view.system_health.status, "unknown");
        assert!(view.alerts.is_empty());
        assert!(view.repositories.repositories.is_empty());
    }

    #[test]
    fn test_css_class() {
        assert_eq!(css_class("Healthy"), "healthy");
        assert_eq!(css_class("<script>"), "-script-");
        assert_eq!(css_class("  "), "unknown");
    }
}
