//! File upload, listing, download, rename, delete and batch export handlers.

use axum::Json;
use axum::body::Body;
use axum::extract::{Multipart, Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use filevault_core::error::AppError;
use filevault_core::types::FileId;
use filevault_entity::file::FileSummary;
use filevault_service::{DispositionMode, FetchMode, UploadParams};

use crate::dto::request::{BatchDownloadRequest, RenameFileRequest};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// RFC 5987 `attr-char` minus the alphanumerics.
const ATTR_CHAR: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');

/// Build a `Content-Disposition` value with an ASCII `filename` fallback
/// and a UTF-8 `filename*`.
pub fn content_disposition(mode: DispositionMode, name: &str) -> String {
    let fallback: String = name
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii() && !c.is_ascii_control() => c,
            _ => '_',
        })
        .collect();

    format!(
        "{}; filename=\"{}\"; filename*=UTF-8''{}",
        mode.as_str(),
        fallback,
        utf8_percent_encode(name, ATTR_CHAR)
    )
}

/// POST /api/files/upload, multipart upload, file in field `file`
///
/// An optional `size` text field carries the client's declared byte count.
pub async fn upload_file(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<FileSummary>>), ApiError> {
    let mut declared_size: Option<u64> = None;
    let mut file: Option<(String, String, axum::body::Bytes)> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("").to_string();
                let content_type = field.content_type().unwrap_or("").to_string();
                let data = field.bytes().await?;
                file = Some((file_name, content_type, data));
            }
            "size" => {
                let text = field.text().await?;
                declared_size = Some(
                    text.trim()
                        .parse()
                        .map_err(|_| AppError::validation("Invalid size"))?,
                );
            }
            _ => {}
        }
    }

    let (file_name, content_type, data) =
        file.ok_or_else(|| AppError::validation("file is required"))?;

    let mut params = UploadParams::new(file_name, content_type, data);
    if let Some(size) = declared_size {
        params.declared_size = size;
    }

    let file = state.upload_service.upload(&auth, params).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(file))))
}

/// GET /api/files
pub async fn list_files(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<FileSummary>>>, ApiError> {
    let files = state.file_service.list_files(&auth).await?;
    Ok(Json(ApiResponse::ok(files)))
}

async fn serve_file(
    state: &AppState,
    auth: &AuthUser,
    id: FileId,
    mode: FetchMode,
) -> Result<Response, ApiError> {
    let result = state.download_service.fetch(auth, id, mode).await?;

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, result.content_type)
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition(result.disposition, &result.file.display_name),
        )
        .header(header::X_CONTENT_TYPE_OPTIONS, "nosniff")
        .body(Body::from_stream(result.stream))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")))?;

    Ok(response)
}

/// GET /api/files/download/{id}
pub async fn download_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<FileId>,
) -> Result<Response, ApiError> {
    serve_file(&state, &auth, id, FetchMode::Download).await
}

/// GET /api/files/view/{id}
pub async fn view_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<FileId>,
) -> Result<Response, ApiError> {
    serve_file(&state, &auth, id, FetchMode::View).await
}

/// PUT /api/files/rename/{id}
pub async fn rename_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<FileId>,
    Json(req): Json<RenameFileRequest>,
) -> Result<Json<ApiResponse<FileSummary>>, ApiError> {
    let file = state.file_service.rename_file(&auth, id, &req.name).await?;
    Ok(Json(ApiResponse::ok(file)))
}

/// DELETE /api/files/{id}
pub async fn delete_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<FileId>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.file_service.delete_file(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "File deleted successfully".to_string(),
    })))
}

/// POST /api/files/batch-download
pub async fn batch_download(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<BatchDownloadRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state.export_service.export(&auth, &req.file_ids).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (
                header::CONTENT_DISPOSITION,
                content_disposition(DispositionMode::Attachment, result.file_name),
            ),
        ],
        result.archive,
    ))
}
