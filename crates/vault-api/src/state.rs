//! Application state shared across all handlers.

use std::sync::Arc;

use vault_auth::jwt::{JwtDecoder, JwtEncoder};
use vault_auth::registry::UserRegistry;
use vault_core::config::AppConfig;
use vault_service::{FileService, FolderService, TreeService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,

    /// User account registry
    pub registry: Arc<UserRegistry>,
    /// JWT token encoder
    pub jwt_encoder: Arc<JwtEncoder>,
    /// JWT token decoder and validator
    pub jwt_decoder: Arc<JwtDecoder>,

    /// Folder operations
    pub folder_service: Arc<FolderService>,
    /// File operations
    pub file_service: Arc<FileService>,
    /// Full-tree queries
    pub tree_service: Arc<TreeService>,
}
