//! Content store: opaque keys in, bytes out.

use std::sync::Arc;

use bytes::Bytes;
use tracing::debug;
use uuid::Uuid;

use filevault_core::result::AppResult;
use filevault_core::traits::storage::{ByteStream, StorageProvider};

use crate::naming;

/// Stores blobs under freshly generated keys.
///
/// Keys have the form `"<uuid>_<name>"`. They are opaque to callers and
/// unique per [`ContentStore::put`] call.
#[derive(Debug, Clone)]
pub struct ContentStore {
    provider: Arc<dyn StorageProvider>,
}

impl ContentStore {
    /// Wrap a storage provider.
    pub fn new(provider: Arc<dyn StorageProvider>) -> Self {
        Self { provider }
    }

    /// Write `data` under a new key derived from `original_name`.
    ///
    /// Directory components of the name are dropped. Returns the key.
    pub async fn put(&self, data: Bytes, original_name: &str) -> AppResult<String> {
        let name = naming::sanitize_file_name(original_name)?;
        let key = naming::storage_key(Uuid::new_v4(), &name);

        let size = data.len();
        self.provider.write(&key, data).await?;
        debug!(key = %key, bytes = size, "Stored blob");
        Ok(key)
    }

    /// Open the blob behind `key` as a stream.
    pub async fn get(&self, key: &str) -> AppResult<ByteStream> {
        self.provider.read(key).await
    }

    /// Read the whole blob behind `key`.
    pub async fn get_bytes(&self, key: &str) -> AppResult<Bytes> {
        self.provider.read_bytes(key).await
    }

    /// Remove the blob behind `key`. Removing a missing blob succeeds.
    pub async fn remove(&self, key: &str) -> AppResult<()> {
        self.provider.delete(key).await
    }

    /// Whether the backing provider is usable.
    pub async fn health_check(&self) -> AppResult<bool> {
        self.provider.health_check().await
    }
}
