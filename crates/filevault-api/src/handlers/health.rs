//! Health check handler.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::warn;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::state::AppState;

fn describe(result: Result<bool, filevault_core::AppError>, up: &str) -> (bool, String) {
    match result {
        Ok(true) => (true, up.to_string()),
        Ok(false) => (false, "unavailable".to_string()),
        Err(e) => {
            warn!(error = %e, "Health probe failed");
            (false, "unavailable".to_string())
        }
    }
}

/// GET /api/health
pub async fn health(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<HealthResponse>>) {
    let (db_ok, database) = describe(state.file_repo.health_check().await, "connected");
    let (storage_ok, storage) = describe(state.content.health_check().await, "available");

    let healthy = db_ok && storage_ok;
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(ApiResponse::ok(HealthResponse {
            status: if healthy { "ok" } else { "degraded" }.to_string(),
            database,
            storage,
            version: env!("CARGO_PKG_VERSION").to_string(),
        })),
    )
}
