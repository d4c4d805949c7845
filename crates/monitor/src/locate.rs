use backup_health_core::is_backup_date;
use backup_health_storage::ObjectStore;
use tracing::{debug, warn};

const DELIMITER: &str = "/";

/// Picks the most recent `YYYYMMDD` segment among `prefixes` listed under `root`.
///
/// Segments that are not exactly eight digits are skipped silently; they are
/// legacy layout or operator leftovers, not faults.
pub fn latest_backup_date<S: AsRef<str>>(root: &str, prefixes: &[S]) -> Option<String> {
    let root_prefix = format!("{root}{DELIMITER}");
    prefixes
        .iter()
        .filter_map(|p| p.as_ref().strip_prefix(root_prefix.as_str()))
        .map(|rest| rest.strip_suffix(DELIMITER).unwrap_or(rest))
        .filter(|segment| is_backup_date(segment))
        .max()
        .map(str::to_owned)
}

/// Lists `root/` and returns the most recent backup date. A failed listing
/// is treated as an empty bucket.
pub async fn locate_latest_backup(store: &dyn ObjectStore, root: &str) -> Option<String> {
    let prefix = format!("{root}{DELIMITER}");
    let prefixes = match store.list(&prefix, DELIMITER).await {
        Ok(prefixes) => prefixes,
        Err(e) => {
            warn!(%prefix, error = %e, "listing backup prefixes failed, treating as empty");
            return None;
        }
    };
    debug!(%prefix, candidates = prefixes.len(), "listed backup prefixes");
    latest_backup_date(root, prefixes.as_slice())
}
