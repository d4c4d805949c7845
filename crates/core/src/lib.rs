pub mod health;
pub mod manifest;
pub mod options;

pub use health::{
    AgeStatus, BackupFileStatus, BackupHealthResponse, HealthChecks, HealthIssue, HealthStatus,
    LastBackupInfo, Severity,
};
pub use manifest::{
    is_backup_date, BackupManifest, D1Section, KvSection, ManifestError, ManifestSummary,
    RetentionPolicy, MANIFEST_FILE_NAME,
};
pub use options::{CheckOptions, ThresholdError, Thresholds};
