//! Backup integrity and freshness evaluation.
//!
//! [`HealthMonitor::check`] runs the whole pipeline against an
//! [`ObjectStore`]: locate the newest dated prefix, load its manifest, check
//! every declared file, classify age and route count, then reduce the issue
//! list to one status. Storage faults read as absence; the only error is an
//! invalid threshold override, rejected before any storage call.

pub mod completeness;
pub mod freshness;
pub mod locate;
pub mod manifest;
pub mod status;

use std::sync::Arc;

use backup_health_core::{
    BackupHealthResponse, CheckOptions, HealthChecks, HealthIssue, LastBackupInfo, ThresholdError,
    Thresholds,
};
use backup_health_storage::ObjectStore;
use chrono::{DateTime, Utc};
use tracing::info;

pub use locate::latest_backup_date;
pub use status::aggregate_status;

pub const DEFAULT_ROOT: &str = "daily";

pub const NO_BACKUP_MESSAGE: &str = "No backup found in R2 bucket";
pub const INVALID_MANIFEST_MESSAGE: &str = "Backup manifest is missing or invalid";

#[derive(Clone)]
pub struct HealthMonitor {
    store: Arc<dyn ObjectStore>,
    root: String,
    base: Thresholds,
}

impl HealthMonitor {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            store,
            root: DEFAULT_ROOT.to_owned(),
            base: Thresholds::default(),
        }
    }

    /// Prefix under which dated backups live, without a trailing `/`.
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = root.into().trim_end_matches('/').to_owned();
        self
    }

    /// Thresholds used for any value a call's [`CheckOptions`] leaves unset.
    pub fn with_thresholds(mut self, base: Thresholds) -> Self {
        self.base = base;
        self
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.base
    }

    pub async fn check(&self, options: &CheckOptions) -> Result<BackupHealthResponse, ThresholdError> {
        self.check_at(options, Utc::now()).await
    }

    pub async fn check_at(
        &self,
        options: &CheckOptions,
        now: DateTime<Utc>,
    ) -> Result<BackupHealthResponse, ThresholdError> {
        let thresholds = options.resolve(&self.base)?;
        Ok(evaluate(self.store.as_ref(), &self.root, &thresholds, now).await)
    }
}

/// One-off evaluation with the default root and thresholds.
pub async fn check_backup_health(
    store: &dyn ObjectStore,
    options: &CheckOptions,
) -> Result<BackupHealthResponse, ThresholdError> {
    let thresholds = options.resolve(&Thresholds::default())?;
    Ok(evaluate(store, DEFAULT_ROOT, &thresholds, Utc::now()).await)
}

async fn evaluate(
    store: &dyn ObjectStore,
    root: &str,
    thresholds: &Thresholds,
    now: DateTime<Utc>,
) -> BackupHealthResponse {
    let mut checks = HealthChecks::default();
    let mut issues = Vec::new();

    let last_backup = match locate::locate_latest_backup(store, root).await {
        None => {
            issues.push(HealthIssue::critical(NO_BACKUP_MESSAGE));
            None
        }
        Some(date) => {
            checks.backup_exists = true;
            Some(inspect_backup(store, root, date, thresholds, now, &mut checks, &mut issues).await)
        }
    };

    let status = aggregate_status(&issues);
    info!(
        status = status.as_str(),
        date = last_backup.as_ref().map(|b| b.date.as_str()),
        issues = issues.len(),
        "backup health evaluated"
    );

    BackupHealthResponse {
        status,
        timestamp: now,
        last_backup,
        issues,
        checks,
    }
}

async fn inspect_backup(
    store: &dyn ObjectStore,
    root: &str,
    date: String,
    thresholds: &Thresholds,
    now: DateTime<Utc>,
    checks: &mut HealthChecks,
    issues: &mut Vec<HealthIssue>,
) -> LastBackupInfo {
    let mut last = LastBackupInfo::dated(date);

    let Some(loaded) = manifest::load_manifest(store, root, &last.date).await else {
        issues.push(HealthIssue::critical(INVALID_MANIFEST_MESSAGE));
        return last;
    };
    checks.manifest_valid = true;

    let expected = completeness::expected_files(&manifest::manifest_key(root, &last.date), &loaded);
    last.files = completeness::stat_files(store, &expected).await;
    match completeness::missing_files_issue(&last.files) {
        Some(issue) => issues.push(issue),
        None => checks.files_complete = true,
    }

    let age = freshness::age_hours(now, loaded.timestamp);
    checks.backup_age = freshness::classify_age(age, thresholds);
    issues.extend(freshness::age_issue(age, checks.backup_age, thresholds));

    match freshness::route_count_issue(loaded.kv.total_routes, thresholds) {
        Some(issue) => issues.push(issue),
        None => checks.route_count_ok = true,
    }

    last.timestamp = Some(loaded.timestamp);
    last.age_hours = Some(age);
    last.manifest = Some(loaded.summary());
    last
}
