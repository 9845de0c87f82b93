//! File fetch service: download as attachment or view inline.

use std::sync::Arc;

use tracing::{debug, error};

use filevault_core::error::{AppError, ErrorKind};
use filevault_core::traits::storage::ByteStream;
use filevault_core::types::FileId;
use filevault_database::repositories::FileRecordStore;
use filevault_entity::file::FileSummary;
use filevault_storage::ContentStore;
use filevault_storage::naming::extension;

use super::access::require_owned;
use super::upload::DEFAULT_CONTENT_TYPE;
use crate::context::RequestContext;

/// How the caller wants the content presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Save to disk.
    Download,
    /// Render in place.
    View,
}

/// Presentation hint for the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispositionMode {
    /// `attachment`
    Attachment,
    /// `inline`
    Inline,
}

impl DispositionMode {
    /// The disposition type token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Attachment => "attachment",
            Self::Inline => "inline",
        }
    }
}

/// Content and presentation metadata for a fetched file.
pub struct FetchResult {
    /// File metadata.
    pub file: FileSummary,
    /// File content.
    pub stream: ByteStream,
    /// MIME type for Content-Type.
    pub content_type: String,
    /// Presentation hint.
    pub disposition: DispositionMode,
}

impl std::fmt::Debug for FetchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchResult")
            .field("file", &self.file)
            .field("content_type", &self.content_type)
            .field("disposition", &self.disposition)
            .finish()
    }
}

/// Content type used for inline viewing, picked from the name's extension.
pub fn view_content_type(name: &str) -> &'static str {
    let Some(ext) = extension(name) else {
        return DEFAULT_CONTENT_TYPE;
    };
    match ext.to_ascii_lowercase().as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "txt" => "text/plain",
        "html" | "htm" => "text/html",
        "mp4" => "video/mp4",
        "mp3" => "audio/mpeg",
        _ => DEFAULT_CONTENT_TYPE,
    }
}

/// Serves file content to its owner.
#[derive(Debug, Clone)]
pub struct DownloadService {
    /// File record store.
    file_repo: Arc<dyn FileRecordStore>,
    /// Blob store.
    content: Arc<ContentStore>,
}

impl DownloadService {
    /// Creates a new download service.
    pub fn new(file_repo: Arc<dyn FileRecordStore>, content: Arc<ContentStore>) -> Self {
        Self { file_repo, content }
    }

    /// Open a file for the caller.
    pub async fn fetch(
        &self,
        ctx: &RequestContext,
        file_id: FileId,
        mode: FetchMode,
    ) -> Result<FetchResult, AppError> {
        let record = require_owned(self.file_repo.as_ref(), file_id, ctx.user_id).await?;

        let stream = match self.content.get(&record.storage_key).await {
            Ok(stream) => stream,
            Err(e) if e.is(ErrorKind::NotFound) => {
                error!(file_id = %file_id, "Blob missing for live file record");
                return Err(AppError::not_found(format!(
                    "File not found: {}",
                    record.display_name
                )));
            }
            Err(e) => return Err(e),
        };

        let (content_type, disposition) = match mode {
            FetchMode::Download => (DEFAULT_CONTENT_TYPE, DispositionMode::Attachment),
            FetchMode::View => (
                view_content_type(&record.display_name),
                DispositionMode::Inline,
            ),
        };

        debug!(user_id = %ctx.user_id, file_id = %file_id, ?mode, "Serving file");

        Ok(FetchResult {
            file: FileSummary::from(record),
            stream,
            content_type: content_type.to_string(),
            disposition,
        })
    }
}
