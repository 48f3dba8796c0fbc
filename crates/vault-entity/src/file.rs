//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vault_core::types::{ContentKey, FileId, FolderId, OwnerId};

/// A file record in the tree index.
///
/// The record holds metadata only; the bytes live in the content store
/// behind `content_key`. Exactly one file record owns a given content key
/// at any time — replacing content binds a new key before the old one is
/// released, and deleting the file releases its key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct File {
    /// Unique file identifier.
    pub id: FileId,
    /// The file owner.
    pub owner_id: OwnerId,
    /// The file name (including extension). Unlike folders, duplicate
    /// names within a folder are permitted; files disambiguate by `id`.
    pub name: String,
    /// The containing folder (None for root-level files).
    pub folder_id: Option<FolderId>,
    /// Size in bytes; mirrors the stored content length.
    pub size: u64,
    /// MIME type, declared by the uploader or sniffed from the name.
    pub mime_type: String,
    /// Reference into the content store.
    pub content_key: ContentKey,
    /// Whether the owner has starred this file.
    pub starred: bool,
    /// When the file was created.
    pub created_at: DateTime<Utc>,
    /// When the file metadata or content was last changed.
    pub updated_at: DateTime<Utc>,
}

impl File {
    /// Get the file extension (lowercase), if any.
    pub fn extension(&self) -> Option<String> {
        self.name
            .rsplit('.')
            .next()
            .filter(|ext| *ext != self.name)
            .map(|ext| ext.to_lowercase())
    }
}

/// Data required to create a new file record after its content has been
/// streamed into the content store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFile {
    /// The file name.
    pub name: String,
    /// The containing folder (None for root-level).
    pub folder_id: Option<FolderId>,
    /// Observed size in bytes.
    pub size: u64,
    /// MIME type.
    pub mime_type: String,
    /// The freshly written content key.
    pub content_key: ContentKey,
}
