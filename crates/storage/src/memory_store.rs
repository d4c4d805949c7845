use std::collections::{BTreeMap, BTreeSet};

use anyhow::Result;
use tokio::sync::RwLock;

use crate::store::{ObjectMeta, ObjectStore, StoreError};

/// In-memory bucket for tests, with per-key fault injection.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: RwLock<BTreeMap<String, Vec<u8>>>,
    failing: RwLock<BTreeSet<String>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_objects<K, V>(objects: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Vec<u8>>,
    {
        let objects = objects
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            objects: RwLock::new(objects),
            failing: RwLock::default(),
        }
    }

    pub async fn put(&self, key: impl Into<String>, body: impl Into<Vec<u8>>) {
        self.objects.write().await.insert(key.into(), body.into());
    }

    pub async fn remove(&self, key: &str) {
        self.objects.write().await.remove(key);
    }

    /// Every later call addressing exactly `key` (a list prefix or an object key) errors.
    pub async fn fail_on(&self, key: impl Into<String>) {
        self.failing.write().await.insert(key.into());
    }

    async fn check_fault(&self, key: &str) -> Result<()> {
        if self.failing.read().await.contains(key) {
            return Err(StoreError::Injected(key.to_owned()).into());
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn list(&self, prefix: &str, delimiter: &str) -> Result<Vec<String>> {
        self.check_fault(prefix).await?;
        let objects = self.objects.read().await;
        let children: BTreeSet<String> = objects
            .keys()
            .filter_map(|key| key.strip_prefix(prefix))
            .filter_map(|rest| rest.find(delimiter).map(|idx| &rest[..idx + delimiter.len()]))
            .map(|child| format!("{prefix}{child}"))
            .collect();
        Ok(children.into_iter().collect())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.check_fault(key).await?;
        Ok(self.objects.read().await.get(key).cloned())
    }

    async fn head(&self, key: &str) -> Result<Option<ObjectMeta>> {
        self.check_fault(key).await?;
        Ok(self
            .objects
            .read()
            .await
            .get(key)
            .map(|body| ObjectMeta { size: body.len() as u64 }))
    }
}
