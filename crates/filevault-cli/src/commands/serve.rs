//! Start the FileVault server.

use clap::Args;
use tracing::info;

use filevault_core::config::AppConfig;
use filevault_core::error::AppError;

/// Arguments for the serve command
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Override the server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the server host
    #[arg(long)]
    pub host: Option<String>,

    /// Run database migrations on startup
    #[arg(long)]
    pub auto_migrate: bool,
}

/// Execute the serve command
pub async fn execute(args: &ServeArgs, mut config: AppConfig) -> Result<(), AppError> {
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }

    info!(
        host = %config.server.host,
        port = config.server.port,
        provider = ?config.database.provider,
        "Starting FileVault server"
    );

    let store = filevault_api::connect_file_store(&config, args.auto_migrate).await?;
    filevault_api::run_server(config, store).await
}
