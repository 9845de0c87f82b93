//! In-memory file record store for tests and single-node deployments.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use filevault_core::error::AppError;
use filevault_core::result::AppResult;
use filevault_core::types::{FileId, UserId};
use filevault_entity::file::{CreateFileRecord, FileRecord};

use super::store::FileRecordStore;

/// Records kept in insertion order behind a Tokio read-write lock.
///
/// Contents are lost when the process exits.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileRepository {
    records: Arc<RwLock<Vec<FileRecord>>>,
}

impl MemoryFileRepository {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records held, deleted ones included.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl FileRecordStore for MemoryFileRepository {
    async fn create(&self, data: &CreateFileRecord) -> AppResult<FileRecord> {
        let mut records = self.records.write().await;

        if records.iter().any(|r| r.storage_key == data.storage_key) {
            return Err(AppError::conflict("Storage key already in use"));
        }

        let record = FileRecord {
            id: FileId::new(),
            display_name: data.display_name.clone(),
            content_type: data.content_type.clone(),
            size_bytes: data.size_bytes,
            storage_key: data.storage_key.clone(),
            uploaded_at: Utc::now(),
            owner_id: data.owner_id,
            deleted: false,
            deleted_at: None,
        };
        records.push(record.clone());

        debug!(file_id = %record.id, "Inserted file record");
        Ok(record)
    }

    async fn find_by_id(&self, id: FileId) -> AppResult<Option<FileRecord>> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id == id).cloned())
    }

    async fn find_by_ids(&self, ids: &[FileId]) -> AppResult<Vec<FileRecord>> {
        let wanted: HashSet<FileId> = ids.iter().copied().collect();
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| wanted.contains(&r.id))
            .cloned()
            .collect())
    }

    async fn list_by_owner(
        &self,
        owner_id: UserId,
        include_deleted: bool,
    ) -> AppResult<Vec<FileRecord>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.owner_id == owner_id && (include_deleted || !r.deleted))
            .cloned()
            .collect())
    }

    async fn soft_delete(
        &self,
        id: FileId,
        owner_id: UserId,
        now: DateTime<Utc>,
    ) -> AppResult<u64> {
        let mut records = self.records.write().await;

        match records
            .iter_mut()
            .find(|r| r.id == id && r.owner_id == owner_id && !r.deleted)
        {
            Some(record) => {
                record.deleted = true;
                record.deleted_at = Some(now);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn rename(&self, id: FileId, display_name: &str) -> AppResult<FileRecord> {
        let mut records = self.records.write().await;

        let record = records
            .iter_mut()
            .find(|r| r.id == id && !r.deleted)
            .ok_or_else(|| AppError::not_found(format!("File {id} not found")))?;
        record.display_name = display_name.to_string();
        Ok(record.clone())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
