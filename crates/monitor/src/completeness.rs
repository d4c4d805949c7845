use backup_health_core::{BackupFileStatus, BackupManifest, HealthIssue};
use backup_health_storage::ObjectStore;
use futures::future::join_all;
use tracing::warn;

/// Keys a complete backup must contain: the manifest itself, the route
/// export, and one export per declared table. Each key appears once.
pub fn expected_files(manifest_key: &str, manifest: &BackupManifest) -> Vec<String> {
    let mut keys: Vec<String> = Vec::with_capacity(manifest.d1.files.len() + 2);
    for key in std::iter::once(manifest_key).chain(manifest.declared_files()) {
        if !keys.iter().any(|k| k == key) {
            keys.push(key.to_owned());
        }
    }
    keys
}

async fn stat_file(store: &dyn ObjectStore, key: &str) -> BackupFileStatus {
    match store.head(key).await {
        Ok(Some(meta)) => BackupFileStatus::present(key, meta.size),
        Ok(None) => BackupFileStatus::missing(key),
        Err(e) => {
            warn!(%key, error = %e, "probing backup file failed, counting it as missing");
            BackupFileStatus::missing(key)
        }
    }
}

/// Probes every key concurrently; results keep the order of `keys`.
pub async fn stat_files(store: &dyn ObjectStore, keys: &[String]) -> Vec<BackupFileStatus> {
    join_all(keys.iter().map(|key| stat_file(store, key))).await
}

pub fn missing_files_issue(files: &[BackupFileStatus]) -> Option<HealthIssue> {
    let missing: Vec<&str> = files
        .iter()
        .filter(|f| !f.exists)
        .map(|f| f.key.as_str())
        .collect();
    if missing.is_empty() {
        return None;
    }
    Some(HealthIssue::critical(format!(
        "Missing backup files: {}",
        missing.join(", ")
    )))
}
