use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the manifest object inside each dated backup prefix.
pub const MANIFEST_FILE_NAME: &str = "manifest.json";

/// Per-run metadata written by the backup job next to the exported files.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BackupManifest {
    pub version: String,
    /// Creation instant, milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// `YYYYMMDD`, matching the prefix the manifest lives under.
    pub date: String,
    pub kv: KvSection,
    pub d1: D1Section,
    #[serde(default)]
    pub retention: Option<RetentionPolicy>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KvSection {
    pub domains: Vec<String>,
    pub total_routes: i64,
    pub file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct D1Section {
    pub tables: Vec<String>,
    pub total_rows: i64,
    pub files: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RetentionPolicy {
    pub daily: i64,
    pub weekly: i64,
}

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("manifest is not valid JSON for the expected layout: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("manifest date {found:?} does not match backup prefix {expected:?}")]
    DateMismatch { expected: String, found: String },
}

impl BackupManifest {
    /// Parses a manifest body and checks it belongs to the prefix `date`.
    pub fn parse_for_date(body: &[u8], date: &str) -> Result<Self, ManifestError> {
        let manifest: BackupManifest = serde_json::from_slice(body)?;
        if manifest.date != date {
            return Err(ManifestError::DateMismatch {
                expected: date.to_owned(),
                found: manifest.date,
            });
        }
        Ok(manifest)
    }

    /// Object keys the backup run claims to have written, manifest excluded,
    /// route export first and then table exports ordered by table name.
    pub fn declared_files(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.kv.file.as_str()).chain(self.d1.files.values().map(String::as_str))
    }

    pub fn summary(&self) -> ManifestSummary {
        ManifestSummary {
            version: self.version.clone(),
            domains: self.kv.domains.clone(),
            total_routes: self.kv.total_routes,
            tables: self.d1.tables.clone(),
            total_rows: self.d1.total_rows,
            retention: self.retention.clone(),
        }
    }
}

/// Manifest contents without the object-key pointers, as reported to consumers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ManifestSummary {
    pub version: String,
    pub domains: Vec<String>,
    pub total_routes: i64,
    pub tables: Vec<String>,
    pub total_rows: i64,
    pub retention: Option<RetentionPolicy>,
}

/// Returns `true` for an 8-digit, all-ASCII-numeric `YYYYMMDD` segment.
pub fn is_backup_date(segment: &str) -> bool {
    segment.len() == 8 && segment.bytes().all(|b| b.is_ascii_digit())
}
