//! Content store and tree index configuration.

use serde::{Deserialize, Serialize};

/// Storage configuration: where bytes, the tree snapshot, and the user
/// registry live on disk, plus upload limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory of the content store.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// Path of the tree index snapshot file.
    #[serde(default = "default_index_path")]
    pub index_path: String,
    /// Path of the user registry file.
    #[serde(default = "default_users_path")]
    pub users_path: String,
    /// Maximum accepted upload size in bytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size_bytes: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            index_path: default_index_path(),
            users_path: default_users_path(),
            max_upload_size_bytes: default_max_upload_size(),
        }
    }
}

fn default_data_dir() -> String {
    "./data/content".to_string()
}

fn default_index_path() -> String {
    "./data/index.json".to_string()
}

fn default_users_path() -> String {
    "./data/users.json".to_string()
}

fn default_max_upload_size() -> u64 {
    // 1 GiB
    1024 * 1024 * 1024
}
