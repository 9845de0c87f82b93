//! PostgreSQL file record repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use filevault_core::error::{AppError, ErrorKind};
use filevault_core::result::AppResult;
use filevault_core::types::{FileId, UserId};
use filevault_entity::file::{CreateFileRecord, FileRecord};

use super::store::FileRecordStore;

const COLUMNS: &str = "id, display_name, content_type, size_bytes, storage_key, \
                       uploaded_at, owner_id, deleted, deleted_at";

/// Repository for file records backed by the `files` table.
#[derive(Debug, Clone)]
pub struct PgFileRepository {
    pool: PgPool,
}

impl PgFileRepository {
    /// Create a new file repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileRecordStore for PgFileRepository {
    async fn create(&self, data: &CreateFileRecord) -> AppResult<FileRecord> {
        sqlx::query_as::<_, FileRecord>(&format!(
            "INSERT INTO files (display_name, content_type, size_bytes, storage_key, owner_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {COLUMNS}"
        ))
        .bind(&data.display_name)
        .bind(&data.content_type)
        .bind(data.size_bytes)
        .bind(&data.storage_key)
        .bind(data.owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("files_storage_key_key") =>
            {
                AppError::conflict("Storage key already in use")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create file record", e),
        })
    }

    async fn find_by_id(&self, id: FileId) -> AppResult<Option<FileRecord>> {
        sqlx::query_as::<_, FileRecord>(&format!("SELECT {COLUMNS} FROM files WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file", e))
    }

    async fn find_by_ids(&self, ids: &[FileId]) -> AppResult<Vec<FileRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = ids.iter().map(|id| id.into_uuid()).collect();

        sqlx::query_as::<_, FileRecord>(&format!(
            "SELECT {COLUMNS} FROM files WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find files", e))
    }

    async fn list_by_owner(
        &self,
        owner_id: UserId,
        include_deleted: bool,
    ) -> AppResult<Vec<FileRecord>> {
        sqlx::query_as::<_, FileRecord>(&format!(
            "SELECT {COLUMNS} FROM files \
             WHERE owner_id = $1 AND ($2 OR deleted = FALSE) \
             ORDER BY uploaded_at ASC, id ASC"
        ))
        .bind(owner_id)
        .bind(include_deleted)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list files", e))
    }

    async fn soft_delete(
        &self,
        id: FileId,
        owner_id: UserId,
        now: DateTime<Utc>,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE files SET deleted = TRUE, deleted_at = $3 \
             WHERE id = $1 AND owner_id = $2 AND deleted = FALSE",
        )
        .bind(id)
        .bind(owner_id)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete file", e))?;

        Ok(result.rows_affected())
    }

    async fn rename(&self, id: FileId, display_name: &str) -> AppResult<FileRecord> {
        sqlx::query_as::<_, FileRecord>(&format!(
            "UPDATE files SET display_name = $2 \
             WHERE id = $1 AND deleted = FALSE RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(display_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to rename file", e))?
        .ok_or_else(|| AppError::not_found(format!("File {id} not found")))
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }
}
