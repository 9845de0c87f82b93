//! The metadata store contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use filevault_core::result::AppResult;
use filevault_core::types::{FileId, UserId};
use filevault_entity::file::{CreateFileRecord, FileRecord};

/// Persistence operations over [`FileRecord`]s.
///
/// No operation touches `owner_id` after creation, and no operation
/// physically removes a record.
#[async_trait]
pub trait FileRecordStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a new live record. The store assigns `id` and `uploaded_at`.
    ///
    /// A duplicate `storage_key` fails with `Conflict`.
    async fn create(&self, data: &CreateFileRecord) -> AppResult<FileRecord>;

    /// Find a record by id, deleted or not.
    async fn find_by_id(&self, id: FileId) -> AppResult<Option<FileRecord>>;

    /// Fetch every record whose id is in `ids`. Order is unspecified.
    async fn find_by_ids(&self, ids: &[FileId]) -> AppResult<Vec<FileRecord>>;

    /// All records of `owner_id`, oldest upload first.
    async fn list_by_owner(
        &self,
        owner_id: UserId,
        include_deleted: bool,
    ) -> AppResult<Vec<FileRecord>>;

    /// Mark a live record owned by `owner_id` as deleted.
    ///
    /// Returns the number of records changed: 0 when the record is missing,
    /// foreign, or already deleted.
    async fn soft_delete(&self, id: FileId, owner_id: UserId, now: DateTime<Utc>)
    -> AppResult<u64>;

    /// Replace the display name of a live record.
    async fn rename(&self, id: FileId, display_name: &str) -> AppResult<FileRecord>;

    /// Check that the backing store is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
