//! One-shot `check` command: print the report, signal critical through the exit code.

use anyhow::{Context, Result};
use backup_health_core::{BackupHealthResponse, CheckOptions, HealthStatus};
use backup_health_monitor::HealthMonitor;

/// Exit code when the verdict is critical, for cron and alerting wrappers.
pub const CRITICAL_EXIT_CODE: u8 = 2;

pub fn exit_code(status: HealthStatus) -> u8 {
    match status {
        HealthStatus::Critical => CRITICAL_EXIT_CODE,
        HealthStatus::Healthy | HealthStatus::Warning => 0,
    }
}

pub struct CheckOutcome {
    pub report: BackupHealthResponse,
    pub json: String,
    pub exit_code: u8,
}

pub async fn run_check(monitor: &HealthMonitor) -> Result<CheckOutcome> {
    let report = monitor
        .check(&CheckOptions::default())
        .await
        .context("evaluate backup health")?;
    let json = serde_json::to_string_pretty(&report).context("serialize health report")?;
    let exit_code = exit_code(report.status);
    Ok(CheckOutcome {
        report,
        json,
        exit_code,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use backup_health_core::Thresholds;
    use backup_health_storage::MemoryObjectStore;
    use chrono::Utc;

    #[test]
    fn only_critical_fails_the_command() {
        assert_eq!(exit_code(HealthStatus::Healthy), 0);
        assert_eq!(exit_code(HealthStatus::Warning), 0);
        assert_eq!(exit_code(HealthStatus::Critical), CRITICAL_EXIT_CODE);
    }

    #[tokio::test]
    async fn empty_bucket_prints_report_and_exits_critical() {
        let monitor = HealthMonitor::new(Arc::new(MemoryObjectStore::new()));
        let outcome = run_check(&monitor).await.expect("check");

        assert_eq!(outcome.exit_code, CRITICAL_EXIT_CODE);
        let printed: serde_json::Value = serde_json::from_str(&outcome.json).expect("json");
        assert_eq!(printed["status"], "critical");
        assert_eq!(printed["issues"][0]["message"], "No backup found in R2 bucket");
    }

    #[tokio::test]
    async fn low_route_count_warns_but_exits_zero() {
        let now = Utc::now().timestamp_millis();
        let manifest = serde_json::json!({
            "version": "1.0",
            "timestamp": now,
            "date": "20260122",
            "kv": { "domains": [], "totalRoutes": 3, "file": "daily/20260122/kv-routes.json" },
            "d1": { "tables": [], "totalRows": 0, "files": {} }
        });
        let store = MemoryObjectStore::with_objects([
            ("daily/20260122/manifest.json", manifest.to_string()),
            ("daily/20260122/kv-routes.json", "[]".to_owned()),
        ]);
        let outcome = run_check(&HealthMonitor::new(Arc::new(store)))
            .await
            .expect("check");

        assert_eq!(outcome.report.status, HealthStatus::Warning);
        assert_eq!(outcome.exit_code, 0);
    }

    #[tokio::test]
    async fn invalid_base_thresholds_are_an_error() {
        let monitor = HealthMonitor::new(Arc::new(MemoryObjectStore::new())).with_thresholds(
            Thresholds {
                critical_age_hours: 1.0,
                ..Thresholds::default()
            },
        );
        assert!(run_check(&monitor).await.is_err());
    }
}
