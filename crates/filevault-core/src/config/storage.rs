//! Content store configuration.

use serde::{Deserialize, Serialize};

/// Content store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory owned exclusively by the content store.
    #[serde(default = "default_root_path")]
    pub root_path: String,
    /// Maximum upload size in bytes (default 10 MiB).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
    /// Maximum combined size of the files packed into one export archive
    /// (default 100 MiB).
    #[serde(default = "default_max_export")]
    pub max_export_size_bytes: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_path: default_root_path(),
            max_upload_size_bytes: default_max_upload(),
            max_export_size_bytes: default_max_export(),
        }
    }
}

fn default_root_path() -> String {
    "./data/storage".to_string()
}

fn default_max_upload() -> u64 {
    10_485_760 // 10 MiB
}

fn default_max_export() -> u64 {
    104_857_600 // 100 MiB
}
