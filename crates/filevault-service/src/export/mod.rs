//! Batch export: several files packed into one ZIP archive.

mod archive;
pub mod service;

pub use archive::EntryNamer;
pub use service::{ExportResult, ExportService};
