//! Integration tests for file operations.

use std::io::{Cursor, Read};

use axum::http::StatusCode;
use serde_json::json;

use filevault_core::types::{FileId, UserId};
use filevault_database::FileRecordStore;

use crate::helpers::{TestApp, multipart_request, unknown_id};

#[tokio::test]
async fn test_upload_then_list() {
    let app = TestApp::new().await;
    let token = app.token();

    let id = app.upload(&token, "notes.txt", b"hello").await;

    let response = app.request("GET", "/api/files", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);

    let body = response.json();
    let files = body["data"].as_array().unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["id"], id.as_str());
    assert_eq!(files[0]["display_name"], "notes.txt");
    assert_eq!(files[0]["size_bytes"], 5);
    assert!(files[0].get("storage_key").is_none());
}

#[tokio::test]
async fn test_upload_strips_client_path() {
    let app = TestApp::new().await;
    let token = app.token();

    let response = app
        .send(multipart_request(&token, "../../etc/passwd", "text/plain", b"x"))
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.json()["data"]["display_name"], "passwd");
}

#[tokio::test]
async fn test_upload_over_limit_is_rejected() {
    let app = TestApp::with_config(|c| c.storage.max_upload_size_bytes = 4).await;
    let token = app.token();

    let response = app
        .send(multipart_request(&token, "big.bin", "application/octet-stream", b"0123456789"))
        .await;

    assert_eq!(response.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn test_list_files_unauthenticated() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/files", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app
        .request("GET", "/api/files", None, Some("not-a-token"))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_list_is_scoped_to_owner() {
    let app = TestApp::new().await;
    let alice = app.token();
    let bob = app.token();

    app.upload(&alice, "a.txt", b"a").await;

    let response = app.request("GET", "/api/files", None, Some(&bob)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["data"], json!([]));
}

#[tokio::test]
async fn test_download_returns_content() {
    let app = TestApp::new().await;
    let token = app.token();
    let id = app.upload(&token, "notes.txt", b"hello world").await;

    let response = app
        .request("GET", &format!("/api/files/download/{id}"), None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(&response.body[..], b"hello world");
    assert_eq!(response.header("content-type"), "application/octet-stream");
    assert!(response.header("content-disposition").starts_with("attachment;"));
    assert_eq!(response.header("x-content-type-options"), "nosniff");
}

#[tokio::test]
async fn test_download_streams_blob_as_stored() {
    let app = TestApp::new().await;
    let token = app.token();
    let id = app.upload(&token, "notes.txt", b"short").await;

    let file_id: FileId = id.parse().unwrap();
    let key = app.store.find_by_id(file_id).await.unwrap().unwrap().storage_key;
    std::fs::write(app.storage.path().join(&key), b"rewritten and longer").unwrap();

    let response = app
        .request("GET", &format!("/api/files/download/{id}"), None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(&response.body[..], b"rewritten and longer");
    let length = response.header("content-length");
    assert!(length.is_empty() || length == response.body.len().to_string());
}

#[tokio::test]
async fn test_view_is_inline_with_guessed_type() {
    let app = TestApp::new().await;
    let token = app.token();
    let id = app.upload(&token, "chart.png", b"\x89PNG").await;

    let response = app
        .request("GET", &format!("/api/files/view/{id}"), None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.header("content-type"), "image/png");
    assert!(response.header("content-disposition").starts_with("inline;"));
}

#[tokio::test]
async fn test_foreign_file_is_not_found() {
    let app = TestApp::new().await;
    let owner = app.token();
    let other = app.token();
    let id = app.upload(&owner, "secret.txt", b"s").await;

    let response = app
        .request("GET", &format!("/api/files/download/{id}"), None, Some(&other))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app
        .request(
            "PUT",
            &format!("/api/files/rename/{id}"),
            Some(json!({ "name": "mine.txt" })),
            Some(&other),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app
        .request("DELETE", &format!("/api/files/{id}"), None, Some(&other))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app
        .request("GET", &format!("/api/files/download/{id}"), None, Some(&owner))
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_get_unknown_file_not_found() {
    let app = TestApp::new().await;
    let token = app.token();

    let response = app
        .request(
            "GET",
            &format!("/api/files/download/{}", unknown_id()),
            None,
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json()["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_rename_keeps_extension() {
    let app = TestApp::new().await;
    let token = app.token();
    let id = app.upload(&token, "draft.txt", b"d").await;

    let response = app
        .request(
            "PUT",
            &format!("/api/files/rename/{id}"),
            Some(json!({ "name": "final" })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["data"]["display_name"], "final.txt");
}

#[tokio::test]
async fn test_rename_rejects_blank_name() {
    let app = TestApp::new().await;
    let token = app.token();
    let id = app.upload(&token, "draft.txt", b"d").await;

    let response = app
        .request(
            "PUT",
            &format!("/api/files/rename/{id}"),
            Some(json!({ "name": "   " })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_is_soft() {
    let app = TestApp::new().await;
    let token = app.token();
    let id = app.upload(&token, "old.txt", b"o").await;

    let response = app
        .request("DELETE", &format!("/api/files/{id}"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["data"]["message"], "File deleted successfully");

    let response = app.request("GET", "/api/files", None, Some(&token)).await;
    assert_eq!(response.json()["data"], json!([]));

    let response = app
        .request("GET", &format!("/api/files/download/{id}"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app
        .request("DELETE", &format!("/api/files/{id}"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let file_id: FileId = id.parse().unwrap();
    let record = app.store.find_by_id(file_id).await.unwrap().unwrap();
    assert!(record.deleted);
    assert!(record.deleted_at.is_some());
}

#[tokio::test]
async fn test_batch_download_disambiguates_names() {
    let app = TestApp::new().await;
    let user = UserId::new();
    let token = app.token_for(user);

    let first = app.upload(&token, "x.txt", b"first").await;
    let second = app.upload(&token, "x.txt", b"second").await;

    let response = app
        .request(
            "POST",
            "/api/files/batch-download",
            Some(json!({ "file_ids": [first, second, unknown_id()] })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.header("content-type"), "application/zip");
    assert!(response.header("content-disposition").contains("files.zip"));

    let mut archive = zip::ZipArchive::new(Cursor::new(response.body.to_vec())).unwrap();
    assert_eq!(archive.len(), 2);

    let mut contents = String::new();
    archive
        .by_name("x.txt")
        .unwrap()
        .read_to_string(&mut contents)
        .unwrap();
    assert_eq!(contents, "first");

    contents.clear();
    archive
        .by_name("x (2).txt")
        .unwrap()
        .read_to_string(&mut contents)
        .unwrap();
    assert_eq!(contents, "second");
}

#[tokio::test]
async fn test_batch_download_without_accessible_files() {
    let app = TestApp::new().await;
    let owner = app.token();
    let other = app.token();
    let id = app.upload(&owner, "a.txt", b"a").await;

    let response = app
        .request(
            "POST",
            "/api/files/batch-download",
            Some(json!({ "file_ids": [id] })),
            Some(&other),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_batch_download_with_missing_blob_hides_storage_key() {
    let app = TestApp::new().await;
    let token = app.token();
    let a = app.upload(&token, "a.txt", b"a").await;
    let b = app.upload(&token, "b.txt", b"b").await;

    let file_id: FileId = b.parse().unwrap();
    let key = app.store.find_by_id(file_id).await.unwrap().unwrap().storage_key;
    std::fs::remove_file(app.storage.path().join(&key)).unwrap();

    let response = app
        .request(
            "POST",
            "/api/files/batch-download",
            Some(json!({ "file_ids": [a, b] })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    let body = String::from_utf8_lossy(&response.body);
    assert!(!body.contains(&key), "storage key leaked: {body}");
}

#[tokio::test]
async fn test_batch_download_over_limit() {
    let app = TestApp::with_config(|c| c.storage.max_export_size_bytes = 8).await;
    let token = app.token();
    let a = app.upload(&token, "a.txt", b"12345").await;
    let b = app.upload(&token, "b.txt", b"67890").await;

    let response = app
        .request(
            "POST",
            "/api/files/batch-download",
            Some(json!({ "fileIds": [a, b] })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["data"]["status"], "ok");
}
