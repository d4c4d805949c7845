use backup_health_core::{BackupManifest, MANIFEST_FILE_NAME};
use backup_health_storage::ObjectStore;
use tracing::warn;

pub fn manifest_key(root: &str, date: &str) -> String {
    format!("{root}/{date}/{MANIFEST_FILE_NAME}")
}

/// Fetches and validates the manifest for `date`. Absence, a failed fetch,
/// and a malformed body all come back as `None`.
pub async fn load_manifest(store: &dyn ObjectStore, root: &str, date: &str) -> Option<BackupManifest> {
    let key = manifest_key(root, date);
    let body = match store.get(&key).await {
        Ok(Some(body)) => body,
        Ok(None) => {
            warn!(%key, "backup manifest not found");
            return None;
        }
        Err(e) => {
            warn!(%key, error = %e, "fetching backup manifest failed");
            return None;
        }
    };

    match BackupManifest::parse_for_date(&body, date) {
        Ok(manifest) => Some(manifest),
        Err(e) => {
            warn!(%key, error = %e, "backup manifest rejected");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backup_health_storage::MemoryObjectStore;

    fn manifest_json(date: &str) -> String {
        serde_json::json!({
            "version": "1.0",
            "timestamp": 1769040000000i64,
            "date": date,
            "kv": { "domains": [], "totalRoutes": 120, "file": format!("daily/{date}/kv-routes.json") },
            "d1": { "tables": [], "totalRows": 0, "files": {} },
            "retention": { "daily": 7, "weekly": 4 }
        })
        .to_string()
    }

    #[tokio::test]
    async fn loads_manifest_under_its_date() {
        let store = MemoryObjectStore::with_objects([(
            "daily/20260122/manifest.json",
            manifest_json("20260122"),
        )]);
        let manifest = load_manifest(&store, "daily", "20260122").await.expect("manifest");
        assert_eq!(manifest.kv.total_routes, 120);
    }

    #[tokio::test]
    async fn missing_invalid_and_failing_manifests_are_none() {
        let store = MemoryObjectStore::with_objects([
            ("daily/20260120/manifest.json", "{ truncated".to_owned()),
            ("daily/20260121/manifest.json", manifest_json("20260119")),
            ("daily/20260123/manifest.json", manifest_json("20260123")),
        ]);
        store.fail_on("daily/20260123/manifest.json").await;

        assert!(load_manifest(&store, "daily", "20260120").await.is_none());
        assert!(load_manifest(&store, "daily", "20260121").await.is_none());
        assert!(load_manifest(&store, "daily", "20260122").await.is_none());
        assert!(load_manifest(&store, "daily", "20260123").await.is_none());
    }
}
