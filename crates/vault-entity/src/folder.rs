//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vault_core::types::{FolderId, OwnerId};

/// A folder in one owner's file hierarchy.
///
/// The parent/child graph restricted to one owner is a forest: `parent_id`
/// links never form a cycle, and no two sibling folders share a name.
/// Both invariants are enforced by the tree index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: FolderId,
    /// The folder owner; the isolation boundary for every query.
    pub owner_id: OwnerId,
    /// Folder name, non-empty and unique among siblings.
    pub name: String,
    /// Parent folder ID (None for root-level folders).
    pub parent_id: Option<FolderId>,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// When the folder was last renamed or moved.
    pub updated_at: DateTime<Utc>,
}

impl Folder {
    /// Check if this is a root-level folder (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Data required to create a new folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolder {
    /// Folder name.
    pub name: String,
    /// Parent folder (None for root-level).
    pub parent_id: Option<FolderId>,
}
