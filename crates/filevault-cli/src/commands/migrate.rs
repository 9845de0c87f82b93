//! Database migration management commands.

use clap::{Args, Subcommand};

use filevault_core::config::{AppConfig, DatabaseProvider};
use filevault_core::error::AppError;
use filevault_database::{connection, migration};

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
    /// Show migration status
    Status,
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, config: &AppConfig) -> Result<(), AppError> {
    if config.database.provider == DatabaseProvider::Memory {
        return Err(AppError::configuration(
            "Migrations require database.provider = \"postgres\"",
        ));
    }

    let pool = connection::connect(&config.database).await?;

    match &args.command {
        MigrateCommand::Run => {
            migration::run_migrations(&pool).await?;
            println!("✓ All migrations applied successfully.");
        }
        MigrateCommand::Status => {
            println!("Migration status:");
            for entry in migration::migration_status(&pool).await? {
                let state = if entry.applied { "applied" } else { "pending" };
                println!("  {} - {} ({})", entry.version, entry.description, state);
            }
        }
    }

    pool.close().await;
    Ok(())
}
