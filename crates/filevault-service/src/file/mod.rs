//! File lifecycle services: upload, list, fetch, rename, delete.

mod access;
pub mod download;
pub mod service;
pub mod upload;

pub use download::{DispositionMode, DownloadService, FetchMode, FetchResult};
pub use service::FileService;
pub use upload::{UploadParams, UploadService};
