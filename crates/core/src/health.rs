use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::manifest::ManifestSummary;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Critical,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Warning,
    Critical,
}

impl HealthStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Warning => "warning",
            HealthStatus::Critical => "critical",
        }
    }
}

impl From<Severity> for HealthStatus {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Warning => HealthStatus::Warning,
            Severity::Critical => HealthStatus::Critical,
        }
    }
}

/// Freshness classification. Ordered from best to worst.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum AgeStatus {
    Ok,
    Warning,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthIssue {
    pub severity: Severity,
    pub message: String,
}

impl HealthIssue {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn critical(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Critical,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HealthChecks {
    pub backup_exists: bool,
    pub backup_age: AgeStatus,
    pub manifest_valid: bool,
    pub files_complete: bool,
    pub route_count_ok: bool,
}

impl Default for HealthChecks {
    /// Every signal starts failed and is only flipped by the stage that proves it.
    fn default() -> Self {
        Self {
            backup_exists: false,
            backup_age: AgeStatus::Critical,
            manifest_valid: false,
            files_complete: false,
            route_count_ok: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BackupFileStatus {
    pub key: String,
    pub size: u64,
    pub exists: bool,
}

impl BackupFileStatus {
    pub fn present(key: impl Into<String>, size: u64) -> Self {
        Self {
            key: key.into(),
            size,
            exists: true,
        }
    }

    pub fn missing(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            size: 0,
            exists: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LastBackupInfo {
    pub date: String,
    /// Manifest creation time in epoch milliseconds; `None` when the manifest did not load.
    pub timestamp: Option<i64>,
    pub age_hours: Option<f64>,
    pub manifest: Option<ManifestSummary>,
    pub files: Vec<BackupFileStatus>,
}

impl LastBackupInfo {
    pub fn dated(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            timestamp: None,
            age_hours: None,
            manifest: None,
            files: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BackupHealthResponse {
    pub status: HealthStatus,
    pub timestamp: DateTime<Utc>,
    pub last_backup: Option<LastBackupInfo>,
    pub issues: Vec<HealthIssue>,
    pub checks: HealthChecks,
}
