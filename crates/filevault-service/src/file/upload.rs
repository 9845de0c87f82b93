//! File upload service.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};

use filevault_core::config::StorageConfig;
use filevault_core::error::AppError;
use filevault_database::repositories::FileRecordStore;
use filevault_entity::file::{CreateFileRecord, FileSummary};
use filevault_storage::ContentStore;
use filevault_storage::naming::sanitize_file_name;

use crate::context::RequestContext;

/// Content type recorded when the client declares none.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// A single-request upload.
#[derive(Debug, Clone)]
pub struct UploadParams {
    /// Name as declared by the client, possibly with directory parts.
    pub file_name: String,
    /// Declared MIME type. Empty means unknown.
    pub content_type: String,
    /// Declared size; must match `data`.
    pub declared_size: u64,
    /// File content bytes.
    pub data: Bytes,
}

impl UploadParams {
    /// Params whose declared size is taken from `data`.
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, data: Bytes) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            declared_size: data.len() as u64,
            data,
        }
    }
}

/// Stores uploaded content and records its metadata.
#[derive(Clone)]
pub struct UploadService {
    /// File record store.
    file_repo: Arc<dyn FileRecordStore>,
    /// Blob store.
    content: Arc<ContentStore>,
    /// Storage configuration.
    config: StorageConfig,
}

impl std::fmt::Debug for UploadService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadService").finish()
    }
}

impl UploadService {
    /// Creates a new upload service.
    pub fn new(
        file_repo: Arc<dyn FileRecordStore>,
        content: Arc<ContentStore>,
        config: StorageConfig,
    ) -> Self {
        Self {
            file_repo,
            content,
            config,
        }
    }

    /// Stores `params.data` for the caller and returns the new file.
    pub async fn upload(
        &self,
        ctx: &RequestContext,
        params: UploadParams,
    ) -> Result<FileSummary, AppError> {
        let size = params.data.len() as u64;
        if params.declared_size != size {
            return Err(AppError::validation(format!(
                "Declared size {} does not match received {size} bytes",
                params.declared_size
            )));
        }
        if size > self.config.max_upload_size_bytes {
            return Err(AppError::payload_too_large(format!(
                "File exceeds maximum upload size of {} bytes",
                self.config.max_upload_size_bytes
            )));
        }

        let display_name = sanitize_file_name(&params.file_name)?;
        let content_type = match params.content_type.trim() {
            "" => DEFAULT_CONTENT_TYPE.to_string(),
            declared => declared.to_string(),
        };

        let storage_key = self.content.put(params.data, &display_name).await?;

        let record = CreateFileRecord {
            display_name,
            content_type,
            size_bytes: i64::try_from(size)
                .map_err(|_| AppError::validation("File size out of range"))?,
            storage_key,
            owner_id: ctx.user_id,
        };

        let file = match self.file_repo.create(&record).await {
            Ok(file) => file,
            Err(e) => {
                if let Err(cleanup) = self.content.remove(&record.storage_key).await {
                    warn!(
                        user_id = %ctx.user_id,
                        error = %cleanup,
                        "Failed to remove blob after metadata write failed"
                    );
                }
                return Err(e);
            }
        };

        info!(
            user_id = %ctx.user_id,
            file_id = %file.id,
            name = %file.display_name,
            size = file.size_bytes,
            ip = ?ctx.ip_address,
            user_agent = ?ctx.user_agent,
            "Upload completed"
        );

        Ok(FileSummary::from(file))
    }
}
