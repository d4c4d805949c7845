use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::store::{ObjectMeta, ObjectStore, StoreError};

/// A local directory exposed as a bucket. Object keys are relative paths
/// with `/` separators; directories act as prefixes and are never objects.
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, key: &str) -> Result<PathBuf> {
        if key.starts_with('/') {
            return Err(StoreError::InvalidKey(key.to_owned()).into());
        }
        let mut path = self.root.clone();
        for segment in key.split('/') {
            if segment.is_empty() || segment == "." || segment == ".." {
                return Err(StoreError::InvalidKey(key.to_owned()).into());
            }
            path.push(segment);
        }
        Ok(path)
    }
}

#[async_trait::async_trait]
impl ObjectStore for FsObjectStore {
    async fn list(&self, prefix: &str, delimiter: &str) -> Result<Vec<String>> {
        if delimiter != "/" {
            bail!("filesystem bucket only supports the \"/\" delimiter, got {delimiter:?}");
        }
        let dir = match prefix.strip_suffix('/').unwrap_or(prefix) {
            "" => self.root.clone(),
            trimmed => self.resolve(trimmed)?,
        };

        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("list bucket dir: {}", dir.display()))
            }
        };

        let mut prefixes = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .with_context(|| format!("read bucket dir: {}", dir.display()))?
        {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                prefixes.push(format!("{prefix}{name}{delimiter}"));
            }
        }
        prefixes.sort();
        Ok(prefixes)
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.resolve(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound || path.is_dir() => Ok(None),
            Err(e) => Err(e).with_context(|| format!("read object: {}", path.display())),
        }
    }

    async fn head(&self, key: &str) -> Result<Option<ObjectMeta>> {
        let path = self.resolve(key)?;
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(Some(ObjectMeta { size: meta.len() })),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("stat object: {}", path.display())),
        }
    }
}
