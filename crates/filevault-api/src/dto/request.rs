//! Request DTOs.

use serde::{Deserialize, Serialize};

use filevault_core::types::FileId;

/// Rename request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameFileRequest {
    /// New display name.
    pub name: String,
}

/// Batch download request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchDownloadRequest {
    /// Files to pack, in archive order. `fileIds` is accepted too.
    #[serde(alias = "fileIds")]
    pub file_ids: Vec<FileId>,
}
