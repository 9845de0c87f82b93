//! Application builder: wires router + middleware + state into an Axum app.

use std::sync::Arc;

use axum::Router;
use axum::middleware as axum_middleware;
use tower_http::compression::CompressionLayer;
use tracing::{error, info, warn};

use filevault_core::config::{AppConfig, DatabaseProvider};
use filevault_core::error::AppError;
use filevault_database::repositories::{FileRecordStore, MemoryFileRepository, PgFileRepository};
use filevault_database::{connection, migration};
use filevault_storage::{ContentStore, LocalStorageProvider};

use crate::middleware::cors::build_cors_layer;
use crate::middleware::logging::request_logging;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors);

    build_router(state)
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(axum_middleware::from_fn(request_logging))
}

/// Open the metadata store selected by `database.provider`.
///
/// With `run_migrations` set, pending migrations are applied first
/// (Postgres only).
pub async fn connect_file_store(
    config: &AppConfig,
    run_migrations: bool,
) -> Result<Arc<dyn FileRecordStore>, AppError> {
    match config.database.provider {
        DatabaseProvider::Memory => {
            warn!("Using in-memory metadata store; file records are lost on restart");
            Ok(Arc::new(MemoryFileRepository::new()))
        }
        DatabaseProvider::Postgres => {
            let pool = connection::connect(&config.database).await?;
            if run_migrations {
                migration::run_migrations(&pool).await?;
            }
            Ok(Arc::new(PgFileRepository::new(pool)))
        }
    }
}

/// Runs the FileVault server until a shutdown signal arrives.
pub async fn run_server(
    config: AppConfig,
    file_repo: Arc<dyn FileRecordStore>,
) -> Result<(), AppError> {
    info!("Starting FileVault server...");

    info!(root = %config.storage.root_path, "Initializing content store...");
    let provider = LocalStorageProvider::new(&config.storage.root_path).await?;
    let content = Arc::new(ContentStore::new(Arc::new(provider)));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = build_app(AppState::new(config, file_repo, content));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!("FileVault server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    info!("FileVault server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
