//! File record entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use filevault_core::types::{FileId, UserId};

/// Metadata for one uploaded blob.
///
/// Records are never physically removed. A rename touches only
/// `display_name`; a delete touches only `deleted` and `deleted_at`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FileRecord {
    /// Unique file identifier, assigned by the store.
    pub id: FileId,
    /// User-visible name. Not unique.
    pub display_name: String,
    /// MIME type declared at upload.
    pub content_type: String,
    /// Size of the blob in bytes.
    pub size_bytes: i64,
    /// Opaque content store locator. Never leaves the server.
    #[serde(skip_serializing)]
    pub storage_key: String,
    /// When the file was uploaded.
    pub uploaded_at: DateTime<Utc>,
    /// The owning user.
    pub owner_id: UserId,
    /// Soft-delete flag.
    pub deleted: bool,
    /// Set exactly when `deleted` is true.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl FileRecord {
    /// Whether the record is visible to `owner`.
    ///
    /// Absent, deleted and foreign records are treated alike by every
    /// caller-facing operation.
    pub fn is_accessible_by(&self, owner: UserId) -> bool {
        !self.deleted && self.owner_id == owner
    }

    /// Size as an unsigned byte count.
    pub fn size(&self) -> u64 {
        u64::try_from(self.size_bytes).unwrap_or(0)
    }
}

/// Data required to create a new file record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFileRecord {
    /// Sanitized display name.
    pub display_name: String,
    /// MIME type.
    pub content_type: String,
    /// Blob size in bytes.
    pub size_bytes: i64,
    /// Key returned by the content store.
    pub storage_key: String,
    /// The owning user.
    pub owner_id: UserId,
}
