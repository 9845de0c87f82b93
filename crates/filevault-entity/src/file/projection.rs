//! Caller-facing projection of a file record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use filevault_core::types::FileId;

use super::model::FileRecord;

/// What callers see of a file. Carries no storage locator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSummary {
    pub id: FileId,
    pub display_name: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub uploaded_at: DateTime<Utc>,
}

impl From<&FileRecord> for FileSummary {
    fn from(record: &FileRecord) -> Self {
        Self {
            id: record.id,
            display_name: record.display_name.clone(),
            content_type: record.content_type.clone(),
            size_bytes: record.size_bytes,
            uploaded_at: record.uploaded_at,
        }
    }
}

impl From<FileRecord> for FileSummary {
    fn from(record: FileRecord) -> Self {
        Self {
            id: record.id,
            display_name: record.display_name,
            content_type: record.content_type,
            size_bytes: record.size_bytes,
            uploaded_at: record.uploaded_at,
        }
    }
}
