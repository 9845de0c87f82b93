//! Shared fixtures for service tests.

use std::sync::Arc;

use bytes::Bytes;

use filevault_core::config::StorageConfig;
use filevault_core::types::UserId;
use filevault_database::repositories::{FileRecordStore, MemoryFileRepository};
use filevault_entity::file::FileSummary;
use filevault_storage::{ContentStore, LocalStorageProvider};

use crate::context::RequestContext;
use crate::export::ExportService;
use crate::file::{DownloadService, FileService, UploadParams, UploadService};

pub(crate) struct Fixture {
    pub _dir: tempfile::TempDir,
    pub repo: Arc<MemoryFileRepository>,
    pub content: Arc<ContentStore>,
    pub upload: UploadService,
    pub files: FileService,
    pub download: DownloadService,
    pub export: ExportService,
}

impl Fixture {
    pub async fn new() -> Self {
        Self::with_config(StorageConfig::default()).await
    }

    pub async fn with_config(mut config: StorageConfig) -> Self {
        let dir = tempfile::tempdir().unwrap();
        config.root_path = dir.path().to_string_lossy().into_owned();

        let provider = LocalStorageProvider::new(dir.path()).await.unwrap();
        let content = Arc::new(ContentStore::new(Arc::new(provider)));
        let repo = Arc::new(MemoryFileRepository::new());
        let store: Arc<dyn FileRecordStore> = repo.clone();

        Self {
            upload: UploadService::new(store.clone(), content.clone(), config.clone()),
            files: FileService::new(store.clone()),
            download: DownloadService::new(store.clone(), content.clone()),
            export: ExportService::new(store, content.clone(), config),
            _dir: dir,
            repo,
            content,
        }
    }

    pub async fn put(&self, owner: UserId, name: &str, body: &str) -> FileSummary {
        let params = UploadParams::new(name, "text/plain", Bytes::copy_from_slice(body.as_bytes()));
        self.upload
            .upload(&RequestContext::new(owner), params)
            .await
            .unwrap()
    }
}
