//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use filevault_auth::JwtDecoder;
use filevault_core::config::AppConfig;
use filevault_database::repositories::FileRecordStore;
use filevault_service::{DownloadService, ExportService, FileService, UploadService};
use filevault_storage::ContentStore;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// File record store (Postgres or in-memory)
    pub file_repo: Arc<dyn FileRecordStore>,
    /// Blob store
    pub content: Arc<ContentStore>,

    // ── Auth ─────────────────────────────────────────────────
    /// JWT token decoder and validator
    pub jwt_decoder: Arc<JwtDecoder>,

    // ── Services ─────────────────────────────────────────────
    /// Upload service
    pub upload_service: Arc<UploadService>,
    /// File service
    pub file_service: Arc<FileService>,
    /// Download service
    pub download_service: Arc<DownloadService>,
    /// Batch export service
    pub export_service: Arc<ExportService>,
}

impl AppState {
    /// Wire services on top of the given stores.
    pub fn new(
        config: AppConfig,
        file_repo: Arc<dyn FileRecordStore>,
        content: Arc<ContentStore>,
    ) -> Self {
        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));

        let upload_service = Arc::new(UploadService::new(
            Arc::clone(&file_repo),
            Arc::clone(&content),
            config.storage.clone(),
        ));
        let file_service = Arc::new(FileService::new(Arc::clone(&file_repo)));
        let download_service = Arc::new(DownloadService::new(
            Arc::clone(&file_repo),
            Arc::clone(&content),
        ));
        let export_service = Arc::new(ExportService::new(
            Arc::clone(&file_repo),
            Arc::clone(&content),
            config.storage.clone(),
        ));

        Self {
            config: Arc::new(config),
            file_repo,
            content,
            jwt_decoder,
            upload_service,
            file_service,
            download_service,
            export_service,
        }
    }
}
