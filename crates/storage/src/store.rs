use anyhow::Result;
use thiserror::Error;

/// Object metadata returned by a `head` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectMeta {
    pub size: u64,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid object key {0:?}")]
    InvalidKey(String),
    #[error("injected failure for {0:?}")]
    Injected(String),
}

/// Read-only view of a prefix-listable blob store, implemented by the
/// filesystem bucket and the in-memory fake.
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Immediate child prefixes of `prefix`, each ending with `delimiter`.
    async fn list(&self, prefix: &str, delimiter: &str) -> Result<Vec<String>>;

    /// Full object body, or `None` when no object exists at `key`.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Object size without reading the body, or `None` when absent.
    async fn head(&self, key: &str) -> Result<Option<ObjectMeta>>;
}
