//! Batch export service.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use bytes::Bytes;
use tracing::{error, info};

use filevault_core::config::StorageConfig;
use filevault_core::error::{AppError, ErrorKind};
use filevault_core::types::FileId;
use filevault_database::repositories::FileRecordStore;
use filevault_entity::file::FileRecord;
use filevault_storage::ContentStore;

use super::archive::{EntryNamer, build_zip};
use crate::context::RequestContext;

/// Suggested download name of every export.
pub const EXPORT_FILE_NAME: &str = "files.zip";

/// A finished export archive.
#[derive(Debug, Clone)]
pub struct ExportResult {
    /// ZIP archive bytes.
    pub archive: Bytes,
    /// Entry names in archive order.
    pub entries: Vec<String>,
    /// Suggested download name.
    pub file_name: &'static str,
}

/// Packs several of the caller's files into one archive.
#[derive(Debug, Clone)]
pub struct ExportService {
    /// File record store.
    file_repo: Arc<dyn FileRecordStore>,
    /// Blob store.
    content: Arc<ContentStore>,
    /// Storage configuration.
    config: StorageConfig,
}

impl ExportService {
    /// Creates a new export service.
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

    /// Build a ZIP of the requested files the caller can access.
    ///
    /// Inaccessible ids are skipped silently. Entries follow the order of
    /// first appearance in `file_ids`.
    pub async fn export(
        &self,
        ctx: &RequestContext,
        file_ids: &[FileId],
    ) -> Result<ExportResult, AppError> {
        let mut seen = HashSet::new();
        let requested: Vec<FileId> = file_ids
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect();

        let mut found: HashMap<FileId, FileRecord> = self
            .file_repo
            .find_by_ids(&requested)
            .await?
            .into_iter()
            .filter(|record| record.is_accessible_by(ctx.user_id))
            .map(|record| (record.id, record))
            .collect();

        let records: Vec<FileRecord> = requested
            .iter()
            .filter_map(|id| found.remove(id))
            .collect();

        if records.is_empty() {
            return Err(AppError::not_found("No accessible files"));
        }

        let cap = self.config.max_export_size_bytes;
        let declared: u64 = records.iter().map(FileRecord::size).sum();
        if declared > cap {
            return Err(AppError::payload_too_large(format!(
                "Export of {declared} bytes exceeds the limit of {cap} bytes"
            )));
        }

        let mut namer = EntryNamer::new();
        let mut entries = Vec::with_capacity(records.len());
        let mut total = 0u64;
        for record in &records {
            let data = self
                .content
                .get_bytes(&record.storage_key)
                .await
                .map_err(|e| {
                    error!(
                        file_id = %record.id,
                        kind = %e.kind,
                        error = %e.message,
                        "Blob unreadable for live file record"
                    );
                    AppError::storage(format!(
                        "Content unavailable for file: {}",
                        record.display_name
                    ))
                })?;

            total += data.len() as u64;
            if total > cap {
                return Err(AppError::payload_too_large(format!(
                    "Export exceeds the limit of {cap} bytes"
                )));
            }

            entries.push((namer.assign(&record.display_name), data));
        }

        let (archive, entries) = tokio::task::spawn_blocking(move || {
            build_zip(&entries).map(|bytes| (bytes, entries))
        })
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Internal, "Archive task failed", e))??;

        info!(
            user_id = %ctx.user_id,
            files = entries.len(),
            bytes = archive.len(),
            ip = ?ctx.ip_address,
            "Export archive built"
        );

        Ok(ExportResult {
            archive: Bytes::from(archive),
            entries: entries.into_iter().map(|(name, _)| name).collect(),
            file_name: EXPORT_FILE_NAME,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Fixture;
    use filevault_core::types::UserId;
    use std::io::{Cursor, Read};

    fn read_entries(archive: &Bytes) -> Vec<(String, String)> {
        let mut zip = zip::ZipArchive::new(Cursor::new(archive.to_vec())).unwrap();
        (0..zip.len())
            .map(|i| {
                let mut entry = zip.by_index(i).unwrap();
                let mut body = String::new();
                entry.read_to_string(&mut body).unwrap();
                (entry.name().to_string(), body)
            })
            .collect()
    }

    #[tokio::test]
    async fn test_export_only_includes_own_live_files() {
        let fx = Fixture::new().await;
        let alice = UserId::new();
        let bob = UserId::new();
        let mine = fx.put(alice, "mine.txt", "alice").await;
        let deleted = fx.put(alice, "old.txt", "old").await;
        let theirs = fx.put(bob, "theirs.txt", "bob").await;
        let ctx = RequestContext::new(alice);
        fx.files.delete_file(&ctx, deleted.id).await.unwrap();

        let result = fx
            .export
            .export(&ctx, &[theirs.id, mine.id, deleted.id, FileId::new()])
            .await
            .unwrap();

        assert_eq!(result.file_name, "files.zip");
        assert_eq!(result.entries, vec!["mine.txt".to_string()]);
        assert_eq!(
            read_entries(&result.archive),
            vec![("mine.txt".to_string(), "alice".to_string())]
        );
    }

    #[tokio::test]
    async fn test_export_nothing_accessible_is_not_found() {
        let fx = Fixture::new().await;
        let theirs = fx.put(UserId::new(), "t.txt", "t").await;
        let ctx = RequestContext::new(UserId::new());

        let err = fx.export.export(&ctx, &[]).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        let err = fx.export.export(&ctx, &[theirs.id]).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_export_renames_duplicates_in_request_order() {
        let fx = Fixture::new().await;
        let owner = UserId::new();
        let first = fx.put(owner, "x.txt", "one").await;
        let second = fx.put(owner, "x.txt", "two").await;
        let other = fx.put(owner, "y.txt", "why").await;

        let result = fx
            .export
            .export(
                &RequestContext::new(owner),
                &[second.id, other.id, first.id, second.id],
            )
            .await
            .unwrap();

        assert_eq!(result.entries, vec!["x.txt", "y.txt", "x (2).txt"]);
        assert_eq!(
            read_entries(&result.archive),
            vec![
                ("x.txt".to_string(), "two".to_string()),
                ("y.txt".to_string(), "why".to_string()),
                ("x (2).txt".to_string(), "one".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_export_over_cap_is_rejected() {
        let fx = Fixture::with_config(StorageConfig {
            max_export_size_bytes: 5,
            ..StorageConfig::default()
        })
        .await;
        let owner = UserId::new();
        let a = fx.put(owner, "a.txt", "abc").await;
        let b = fx.put(owner, "b.txt", "def").await;
        let ctx = RequestContext::new(owner);

        let err = fx.export.export(&ctx, &[a.id, b.id]).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::PayloadTooLarge);

        let ok = fx.export.export(&ctx, &[a.id]).await.unwrap();
        assert_eq!(ok.entries, vec!["a.txt"]);
    }

    #[tokio::test]
    async fn test_export_missing_blob_hides_storage_key() {
        let fx = Fixture::new().await;
        let owner = UserId::new();
        let a = fx.put(owner, "a.txt", "a").await;
        let b = fx.put(owner, "b.txt", "b").await;

        let key = fx.repo.find_by_id(b.id).await.unwrap().unwrap().storage_key;
        fx.content.remove(&key).await.unwrap();

        let err = fx
            .export
            .export(&RequestContext::new(owner), &[a.id, b.id])
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Storage);
        assert!(err.message.contains("b.txt"));
        assert!(!err.message.contains(&key));
    }
}
