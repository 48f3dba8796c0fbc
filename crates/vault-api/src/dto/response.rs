//! Response DTOs.

use serde::{Deserialize, Serialize};

use vault_entity::file::File;
use vault_entity::folder::Folder;
use vault_entity::user::UserProfile;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Login/register response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Signed identity token.
    pub token: String,
    /// The authenticated user's profile.
    pub user: UserProfile,
}

/// GET /api/folders/{id}/children response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChildrenResponse {
    /// Immediate child folders.
    pub folders: Vec<Folder>,
    /// Files directly inside the folder.
    pub files: Vec<File>,
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
}
