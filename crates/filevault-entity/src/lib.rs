//! # filevault-entity
//!
//! Domain entity models for FileVault. [`file::FileRecord`] is the one
//! persistent entity and maps directly onto the `files` table;
//! [`file::FileSummary`] is the projection handed back to callers.

pub mod file;
