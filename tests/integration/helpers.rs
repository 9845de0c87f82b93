//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Request, StatusCode};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

use filevault_auth::Claims;
use filevault_core::config::{AppConfig, DatabaseProvider};
use filevault_core::types::UserId;
use filevault_database::MemoryFileRepository;
use filevault_storage::{ContentStore, LocalStorageProvider};

const BOUNDARY: &str = "filevault-test-boundary";

/// Test application context
pub struct TestApp {
    /// The Axum app for making test requests
    pub router: Router,
    /// Metadata store shared with the router
    pub store: MemoryFileRepository,
    /// Application config
    pub config: AppConfig,
    /// Content store root
    pub storage: TempDir,
}

impl TestApp {
    /// Create a new test application
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Create a test application after adjusting the default config
    pub async fn with_config(adjust: impl FnOnce(&mut AppConfig)) -> Self {
        let storage = TempDir::new().expect("Failed to create storage dir");

        let mut config = AppConfig::default();
        config.database.provider = DatabaseProvider::Memory;
        config.storage.root_path = storage.path().to_string_lossy().into_owned();
        config.auth.jwt_secret = "integration-test-secret".to_string();
        adjust(&mut config);

        let store = MemoryFileRepository::new();
        let provider = LocalStorageProvider::new(storage.path())
            .await
            .expect("Failed to init storage");
        let content = Arc::new(ContentStore::new(Arc::new(provider)));

        let state = filevault_api::AppState::new(config.clone(), Arc::new(store.clone()), content);
        let router = filevault_api::build_app(state);

        Self {
            router,
            store,
            config,
            storage,
        }
    }

    /// Issue an access token for a fresh user
    pub fn token(&self) -> String {
        self.token_for(UserId::new())
    }

    /// Issue an access token for `user_id`
    pub fn token_for(&self, user_id: UserId) -> String {
        encode(
            &Header::default(),
            &Claims::access(user_id, 3600),
            &EncodingKey::from_secret(self.config.auth.jwt_secret.as_bytes()),
        )
        .expect("Failed to encode token")
    }

    /// Upload `data` as `file_name` and return the new file's id
    pub async fn upload(&self, token: &str, file_name: &str, data: &[u8]) -> String {
        let response = self
            .send(multipart_request(token, file_name, "text/plain", data))
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Upload failed: {:?}",
            response.json()
        );
        response.json()["data"]["id"]
            .as_str()
            .expect("No id in upload response")
            .to_string()
    }

    /// Make a JSON request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        self.send(req).await
    }

    /// Send a prebuilt request
    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024 * 1024)
            .await
            .expect("Failed to read body");

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Build a multipart upload request with a single `file` field
pub fn multipart_request(
    token: &str,
    file_name: &str,
    content_type: &str,
    data: &[u8],
) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/files/upload")
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::from(body))
        .expect("Failed to build request")
}

/// An id that no test ever uploads
pub fn unknown_id() -> String {
    Uuid::new_v4().to_string()
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Raw body
    pub body: Bytes,
}

impl TestResponse {
    /// Parse the body as JSON, `Null` when it is not JSON
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }

    /// Header value as a string
    pub fn header(&self, name: &str) -> &str {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
    }
}
