//! Request DTOs.

use serde::{Deserialize, Serialize};

use vault_core::types::FolderId;

/// POST /api/auth/register and POST /api/auth/login body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialsRequest {
    /// Username.
    pub username: String,
    /// Plaintext password (hashed server-side, never stored).
    pub password: String,
}

/// POST /api/folders body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolderRequest {
    /// Folder name.
    pub name: String,
    /// Parent folder, omitted for root-level.
    #[serde(default)]
    pub parent_id: Option<FolderId>,
}

/// PUT /api/folders/{id} and PUT /api/files/{id} body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameRequest {
    /// New name.
    pub name: String,
}

/// PUT /api/folders/{id}/move body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveFolderRequest {
    /// New parent folder, omitted to move to the root.
    #[serde(default)]
    pub new_parent_id: Option<FolderId>,
}
