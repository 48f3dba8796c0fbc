//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vault_core::types::OwnerId;

/// A registered user. The `id` doubles as the `owner_id` carried in every
/// identity token and threaded through every storage operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier.
    pub id: OwnerId,
    /// Unique login name.
    pub username: String,
    /// Argon2id password hash. API responses expose [`UserProfile`]
    /// instead of this record so the hash never leaves the registry.
    pub password_hash: String,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// Public view of a user, safe to return from the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Unique user identifier.
    pub id: OwnerId,
    /// Login name.
    pub username: String,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            created_at: user.created_at,
        }
    }
}
