//! # filevault-service
//!
//! Business logic for FileVault. The file services own the lifecycle of
//! uploaded content; the export service packs several files into one
//! archive.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references. Every operation takes a
//! [`RequestContext`] whose `user_id` is the already-resolved owner.

pub mod context;
pub mod export;
pub mod file;

#[cfg(test)]
pub(crate) mod testing;

pub use context::RequestContext;
pub use export::{ExportResult, ExportService};
pub use file::{
    DispositionMode, DownloadService, FetchMode, FetchResult, FileService, UploadParams,
    UploadService,
};
