//! Folder operations: create, rename, move, cascade delete, listing, and
//! path resolution.

use std::sync::Arc;

use tracing::error;

use vault_core::error::AppError;
use vault_core::result::AppResult;
use vault_core::traits::content::ContentStore;
use vault_core::types::FolderId;
use vault_entity::file::File;
use vault_entity::folder::{CreateFolder, Folder};
use vault_index::TreeIndex;

use crate::context::RequestContext;

/// Manages folder operations against the tree index, releasing file
/// content through the content store when a cascade delete removes files.
#[derive(Debug, Clone)]
pub struct FolderService {
    index: Arc<TreeIndex>,
    content: Arc<dyn ContentStore>,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(index: Arc<TreeIndex>, content: Arc<dyn ContentStore>) -> Self {
        Self { index, content }
    }

    /// Creates a folder under the given parent (or at the root).
    pub async fn create_folder(
        &self,
        ctx: &RequestContext,
        req: CreateFolder,
    ) -> AppResult<Folder> {
        self.index.create_folder(ctx.owner_id, req).await
    }

    /// Renames a folder.
    pub async fn rename_folder(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
        new_name: &str,
    ) -> AppResult<Folder> {
        self.index
            .rename_folder(ctx.owner_id, folder_id, new_name)
            .await
    }

    /// Moves a folder under a new parent (or to the root).
    pub async fn move_folder(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
        new_parent_id: Option<FolderId>,
    ) -> AppResult<Folder> {
        self.index
            .move_folder(ctx.owner_id, folder_id, new_parent_id)
            .await
    }

    /// Deletes a folder and its whole subtree, then releases every content
    /// key the cascade freed. The index removal is atomic to observers; a
    /// content release failure afterwards is an integrity fault and is
    /// surfaced as such rather than swallowed.
    pub async fn delete_folder(&self, ctx: &RequestContext, folder_id: FolderId) -> AppResult<()> {
        let released = self.index.delete_folder(ctx.owner_id, folder_id).await?;

        let mut failures = 0usize;
        for key in &released {
            if let Err(e) = self.content.delete(*key).await {
                error!(%key, error = %e, "Failed to release content during cascade delete");
                failures += 1;
            }
        }
        if failures > 0 {
            return Err(AppError::integrity(format!(
                "Cascade delete left {failures} of {} content keys unreleased",
                released.len()
            )));
        }
        Ok(())
    }

    /// Gets a folder by ID.
    pub fn get_folder(&self, ctx: &RequestContext, folder_id: FolderId) -> AppResult<Folder> {
        self.index.get_folder(ctx.owner_id, folder_id)
    }

    /// Lists the immediate children of a folder (or of the root).
    pub fn list_children(
        &self,
        ctx: &RequestContext,
        parent_id: Option<FolderId>,
    ) -> AppResult<(Vec<Folder>, Vec<File>)> {
        self.index.list_children(ctx.owner_id, parent_id)
    }

    /// Resolves the root-to-target breadcrumb for a folder.
    pub fn resolve_path(&self, ctx: &RequestContext, folder_id: FolderId) -> AppResult<Vec<Folder>> {
        self.index.resolve_path(ctx.owner_id, folder_id)
    }
}
