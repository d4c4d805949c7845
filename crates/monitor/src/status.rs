use backup_health_core::{HealthIssue, HealthStatus};

/// Worst severity present, or healthy when there are no issues.
pub fn aggregate_status(issues: &[HealthIssue]) -> HealthStatus {
    issues
        .iter()
        .map(|issue| issue.severity)
        .max()
        .map_or(HealthStatus::Healthy, HealthStatus::from)
}
