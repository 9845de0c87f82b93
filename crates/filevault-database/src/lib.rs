//! # filevault-database
//!
//! PostgreSQL connection management and the metadata store for file
//! records, with an in-process implementation for tests and single-node
//! deployments.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::connect;
pub use repositories::{FileRecordStore, MemoryFileRepository, PgFileRepository};
