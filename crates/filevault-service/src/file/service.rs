//! Listing, renaming and deleting files.

use std::sync::Arc;

use tracing::info;

use filevault_core::error::AppError;
use filevault_core::types::FileId;
use filevault_database::repositories::FileRecordStore;
use filevault_entity::file::FileSummary;
use filevault_storage::naming::{extension, sanitize_file_name};

use super::access::require_owned;
use crate::context::RequestContext;

/// Metadata operations over the caller's own files.
#[derive(Debug, Clone)]
pub struct FileService {
    /// File record store.
    file_repo: Arc<dyn FileRecordStore>,
}

impl FileService {
    /// Creates a new file service.
    pub fn new(file_repo: Arc<dyn FileRecordStore>) -> Self {
        Self { file_repo }
    }

    /// The caller's live files, oldest upload first.
    pub async fn list_files(&self, ctx: &RequestContext) -> Result<Vec<FileSummary>, AppError> {
        let records = self.file_repo.list_by_owner(ctx.user_id, false).await?;
        Ok(records.into_iter().map(FileSummary::from).collect())
    }

    /// Change the display name of a file.
    ///
    /// When the new name has no extension and the old one had, the old
    /// extension is carried over.
    pub async fn rename_file(
        &self,
        ctx: &RequestContext,
        file_id: FileId,
        new_name: &str,
    ) -> Result<FileSummary, AppError> {
        if new_name.trim().is_empty() {
            return Err(AppError::validation("New file name cannot be empty"));
        }
        let sanitized = sanitize_file_name(new_name)?;

        let current = require_owned(self.file_repo.as_ref(), file_id, ctx.user_id).await?;

        let display_name = match (extension(&sanitized), extension(&current.display_name)) {
            (None, Some(old_ext)) => format!("{sanitized}.{old_ext}"),
            _ => sanitized,
        };

        let renamed = self.file_repo.rename(file_id, &display_name).await?;

        info!(
            user_id = %ctx.user_id,
            file_id = %file_id,
            from = %current.display_name,
            to = %renamed.display_name,
            ip = ?ctx.ip_address,
            "File renamed"
        );

        Ok(FileSummary::from(renamed))
    }

    /// Soft-delete a file. The blob is kept.
    pub async fn delete_file(&self, ctx: &RequestContext, file_id: FileId) -> Result<(), AppError> {
        let affected = self
            .file_repo
            .soft_delete(file_id, ctx.user_id, ctx.request_time)
            .await?;

        if affected == 0 {
            return Err(AppError::not_found(format!(
                "File not found with id: {file_id}"
            )));
        }

        info!(
            user_id = %ctx.user_id,
            file_id = %file_id,
            ip = ?ctx.ip_address,
            "File deleted"
        );
        Ok(())
    }
}
