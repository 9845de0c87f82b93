//! Ownership checks shared by the file services.

use filevault_core::error::AppError;
use filevault_core::result::AppResult;
use filevault_core::types::{FileId, UserId};
use filevault_database::repositories::FileRecordStore;
use filevault_entity::file::FileRecord;

/// Load `file_id` if it is live and owned by `owner`.
///
/// Missing, deleted and foreign records all yield the same `NotFound`.
pub(crate) async fn require_owned(
    store: &dyn FileRecordStore,
    file_id: FileId,
    owner: UserId,
) -> AppResult<FileRecord> {
    store
        .find_by_id(file_id)
        .await?
        .filter(|record| record.is_accessible_by(owner))
        .ok_or_else(|| AppError::not_found(format!("File not found with id: {file_id}")))
}
