//! The tree index: owner-scoped facade over the record arena.
//!
//! Every public operation takes the acting `owner_id` as an explicit first
//! parameter; a record owned by someone else behaves exactly like an
//! absent record. Mutations serialize per owner through [`OwnerLocks`] and
//! persist a fresh snapshot before returning; reads take only the shared
//! arena guard and never block on other owners.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::Mutex;
use tracing::info;

use vault_core::error::AppError;
use vault_core::result::AppResult;
use vault_core::types::{ContentKey, FileId, FolderId, OwnerId};
use vault_entity::file::{CreateFile, File};
use vault_entity::folder::{CreateFolder, Folder};
use vault_entity::tree::OwnerTree;

use crate::arena::OwnerShard;
use crate::locks::OwnerLocks;
use crate::snapshot::{IndexSnapshot, SnapshotStore};

/// Authoritative store of folder/file metadata, one shard per owner.
#[derive(Debug)]
pub struct TreeIndex {
    shards: RwLock<HashMap<OwnerId, OwnerShard>>,
    locks: OwnerLocks,
    snapshots: SnapshotStore,
    /// Serializes snapshot writes so a later state can never be
    /// overwritten by an earlier one.
    persist_gate: Mutex<()>,
}

impl TreeIndex {
    /// Open the index, loading the snapshot at `snapshot_path` if present.
    pub async fn open(snapshot_path: impl AsRef<Path>) -> AppResult<Self> {
        let snapshots = SnapshotStore::new(snapshot_path.as_ref());
        let mut by_owner: HashMap<OwnerId, (Vec<Folder>, Vec<File>)> = HashMap::new();

        if let Some(snapshot) = snapshots.load().await? {
            for folder in snapshot.folders {
                by_owner.entry(folder.owner_id).or_default().0.push(folder);
            }
            for file in snapshot.files {
                by_owner.entry(file.owner_id).or_default().1.push(file);
            }
        }

        let shards = by_owner
            .into_iter()
            .map(|(owner, (folders, files))| (owner, OwnerShard::from_records(folders, files)))
            .collect();

        Ok(Self {
            shards: RwLock::new(shards),
            locks: OwnerLocks::new(),
            snapshots,
            persist_gate: Mutex::new(()),
        })
    }

    // ── Folder operations ────────────────────────────────────────

    /// Create a folder for `owner_id` under the given parent (or the root).
    pub async fn create_folder(&self, owner_id: OwnerId, req: CreateFolder) -> AppResult<Folder> {
        let lock = self.locks.for_owner(owner_id);
        let _guard = lock.lock().await;

        let folder = self
            .write_shards()?
            .entry(owner_id)
            .or_default()
            .create_folder(owner_id, req)?;
        self.persist().await?;

        info!(%owner_id, folder_id = %folder.id, name = %folder.name, "Folder created");
        Ok(folder)
    }

    /// Rename a folder.
    pub async fn rename_folder(
        &self,
        owner_id: OwnerId,
        folder_id: FolderId,
        new_name: &str,
    ) -> AppResult<Folder> {
        let lock = self.locks.for_owner(owner_id);
        let _guard = lock.lock().await;

        let folder = {
            let mut shards = self.write_shards()?;
            owned_shard_mut(&mut shards, owner_id)?.rename_folder(folder_id, new_name)?
        };
        self.persist().await?;

        info!(%owner_id, %folder_id, name = %folder.name, "Folder renamed");
        Ok(folder)
    }

    /// Move a folder under a new parent (or to the root), rejecting moves
    /// that would make the folder its own descendant's child.
    pub async fn move_folder(
        &self,
        owner_id: OwnerId,
        folder_id: FolderId,
        new_parent_id: Option<FolderId>,
    ) -> AppResult<Folder> {
        let lock = self.locks.for_owner(owner_id);
        let _guard = lock.lock().await;

        let folder = {
            let mut shards = self.write_shards()?;
            owned_shard_mut(&mut shards, owner_id)?.move_folder(folder_id, new_parent_id)?
        };
        self.persist().await?;

        info!(%owner_id, %folder_id, "Folder moved");
        Ok(folder)
    }

    /// Delete a folder and its entire subtree as one atomic unit, returning
    /// the content keys released by the deleted files. The caller must free
    /// those keys in the content store and treat any failure there as fatal.
    pub async fn delete_folder(
        &self,
        owner_id: OwnerId,
        folder_id: FolderId,
    ) -> AppResult<Vec<ContentKey>> {
        let lock = self.locks.for_owner(owner_id);
        let _guard = lock.lock().await;

        let released = {
            let mut shards = self.write_shards()?;
            owned_shard_mut(&mut shards, owner_id)?.delete_folder(folder_id)?
        };
        self.persist().await?;

        info!(%owner_id, %folder_id, files_released = released.len(), "Folder cascade deleted");
        Ok(released)
    }

    /// Get a folder by ID.
    pub fn get_folder(&self, owner_id: OwnerId, folder_id: FolderId) -> AppResult<Folder> {
        self.read_shards()?
            .get(&owner_id)
            .ok_or_else(|| AppError::not_found("Folder not found"))?
            .get_folder(folder_id)
    }

    /// List the immediate children of a folder (or of the root).
    pub fn list_children(
        &self,
        owner_id: OwnerId,
        parent_id: Option<FolderId>,
    ) -> AppResult<(Vec<Folder>, Vec<File>)> {
        let shards = self.read_shards()?;
        match shards.get(&owner_id) {
            Some(shard) => shard.list_children(parent_id),
            // An owner with no records has an empty root and nothing else.
            None => match parent_id {
                None => Ok((Vec::new(), Vec::new())),
                Some(_) => Err(AppError::not_found("Folder not found")),
            },
        }
    }

    /// Resolve the root-to-target breadcrumb for a folder.
    pub fn resolve_path(&self, owner_id: OwnerId, folder_id: FolderId) -> AppResult<Vec<Folder>> {
        self.read_shards()?
            .get(&owner_id)
            .ok_or_else(|| AppError::not_found("Folder not found"))?
            .resolve_path(folder_id)
    }

    /// Snapshot everything the owner holds (read-committed).
    pub fn owner_tree(&self, owner_id: OwnerId) -> AppResult<OwnerTree> {
        Ok(self
            .read_shards()?
            .get(&owner_id)
            .map(OwnerShard::owner_tree)
            .unwrap_or_else(OwnerTree::empty))
    }

    // ── File operations ──────────────────────────────────────────

    /// Commit a file record whose content has already been streamed into
    /// the content store. The target folder is re-validated here, under
    /// the owner lock, because it may have been deleted while the bytes
    /// were in flight; on error the caller discards the new key.
    pub async fn insert_file(&self, owner_id: OwnerId, req: CreateFile) -> AppResult<File> {
        let lock = self.locks.for_owner(owner_id);
        let _guard = lock.lock().await;

        let file = self
            .write_shards()?
            .entry(owner_id)
            .or_default()
            .insert_file(owner_id, req)?;
        self.persist().await?;

        info!(%owner_id, file_id = %file.id, name = %file.name, size = file.size, "File record created");
        Ok(file)
    }

    /// Get a file by ID.
    pub fn get_file(&self, owner_id: OwnerId, file_id: FileId) -> AppResult<File> {
        self.read_shards()?
            .get(&owner_id)
            .ok_or_else(|| AppError::not_found("File not found"))?
            .get_file(file_id)
    }

    /// Rename a file (metadata only).
    pub async fn rename_file(
        &self,
        owner_id: OwnerId,
        file_id: FileId,
        new_name: &str,
    ) -> AppResult<File> {
        let lock = self.locks.for_owner(owner_id);
        let _guard = lock.lock().await;

        let file = {
            let mut shards = self.write_shards()?;
            owned_file_shard_mut(&mut shards, owner_id)?.rename_file(file_id, new_name)?
        };
        self.persist().await?;

        info!(%owner_id, %file_id, name = %file.name, "File renamed");
        Ok(file)
    }

    /// Bind a freshly written content key to a file, returning the updated
    /// record and the old key. The caller releases the old key only after
    /// this returns, so a reader that started before the swap still
    /// completes against valid bytes.
    pub async fn set_file_content(
        &self,
        owner_id: OwnerId,
        file_id: FileId,
        content_key: ContentKey,
        size: u64,
        mime_type: String,
    ) -> AppResult<(File, ContentKey)> {
        let lock = self.locks.for_owner(owner_id);
        let _guard = lock.lock().await;

        let swapped = {
            let mut shards = self.write_shards()?;
            owned_file_shard_mut(&mut shards, owner_id)?
                .set_file_content(file_id, content_key, size, mime_type)?
        };
        self.persist().await?;

        info!(%owner_id, %file_id, size = swapped.0.size, "File content replaced");
        Ok(swapped)
    }

    /// Flip a file's starred flag.
    pub async fn toggle_star(&self, owner_id: OwnerId, file_id: FileId) -> AppResult<File> {
        let lock = self.locks.for_owner(owner_id);
        let _guard = lock.lock().await;

        let file = {
            let mut shards = self.write_shards()?;
            owned_file_shard_mut(&mut shards, owner_id)?.toggle_star(file_id)?
        };
        self.persist().await?;

        info!(%owner_id, %file_id, starred = file.starred, "File star toggled");
        Ok(file)
    }

    /// Delete a file record, returning it so the caller can release its
    /// content key.
    pub async fn delete_file(&self, owner_id: OwnerId, file_id: FileId) -> AppResult<File> {
        let lock = self.locks.for_owner(owner_id);
        let _guard = lock.lock().await;

        let file = {
            let mut shards = self.write_shards()?;
            owned_file_shard_mut(&mut shards, owner_id)?.delete_file(file_id)?
        };
        self.persist().await?;

        info!(%owner_id, %file_id, "File deleted");
        Ok(file)
    }

    // ── Internals ────────────────────────────────────────────────

    fn read_shards(&self) -> AppResult<RwLockReadGuard<'_, HashMap<OwnerId, OwnerShard>>> {
        self.shards
            .read()
            .map_err(|_| AppError::integrity("Tree index lock poisoned"))
    }

    fn write_shards(&self) -> AppResult<RwLockWriteGuard<'_, HashMap<OwnerId, OwnerShard>>> {
        self.shards
            .write()
            .map_err(|_| AppError::integrity("Tree index lock poisoned"))
    }

    /// Serialize the whole index and atomically replace the snapshot file.
    ///
    /// Builds the snapshot inside the persist gate so two racing mutations
    /// (from different owners) can never commit out of order.
    async fn persist(&self) -> AppResult<()> {
        let _gate = self.persist_gate.lock().await;

        let snapshot = {
            let shards = self.read_shards()?;
            let mut snapshot = IndexSnapshot::default();
            for shard in shards.values() {
                let tree = shard.owner_tree();
                snapshot.folders.extend(tree.folders);
                snapshot.files.extend(tree.files);
            }
            snapshot
        };

        self.snapshots.save(&snapshot).await
    }
}

/// Look up an owner's shard for a folder mutation; an absent shard means
/// the folder cannot exist for this owner.
fn owned_shard_mut<'a>(
    shards: &'a mut HashMap<OwnerId, OwnerShard>,
    owner_id: OwnerId,
) -> AppResult<&'a mut OwnerShard> {
    shards
        .get_mut(&owner_id)
        .ok_or_else(|| AppError::not_found("Folder not found"))
}

/// Same as [`owned_shard_mut`] with a file-shaped not-found message.
fn owned_file_shard_mut<'a>(
    shards: &'a mut HashMap<OwnerId, OwnerShard>,
    owner_id: OwnerId,
) -> AppResult<&'a mut OwnerShard> {
    shards
        .get_mut(&owner_id)
        .ok_or_else(|| AppError::not_found("File not found"))
}
