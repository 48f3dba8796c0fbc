//! Per-owner record arena and invariant logic.
//!
//! Everything in this module is synchronous and lock-free: the [`TreeIndex`]
//! wrapper (see `index.rs`) is responsible for taking the per-owner
//! mutation lock and the arena read/write guard around these calls. Keeping
//! the invariant checks and mutations in plain functions makes them
//! testable without any I/O.
//!
//! [`TreeIndex`]: crate::index::TreeIndex

use std::collections::HashMap;

use chrono::Utc;

use vault_core::error::AppError;
use vault_core::result::AppResult;
use vault_core::types::{ContentKey, FileId, FolderId, OwnerId};
use vault_entity::file::{CreateFile, File};
use vault_entity::folder::{CreateFolder, Folder};
use vault_entity::tree::OwnerTree;

/// One owner's folders and files.
///
/// `folder_order` / `file_order` preserve insertion order so listings are
/// stable without a secondary sort key.
#[derive(Debug, Default)]
pub struct OwnerShard {
    folders: HashMap<FolderId, Folder>,
    files: HashMap<FileId, File>,
    folder_order: Vec<FolderId>,
    file_order: Vec<FileId>,
}

impl OwnerShard {
    /// Rebuild a shard from persisted records (already insertion-ordered).
    pub fn from_records(folders: Vec<Folder>, files: Vec<File>) -> Self {
        let folder_order = folders.iter().map(|f| f.id).collect();
        let file_order = files.iter().map(|f| f.id).collect();
        Self {
            folders: folders.into_iter().map(|f| (f.id, f)).collect(),
            files: files.into_iter().map(|f| (f.id, f)).collect(),
            folder_order,
            file_order,
        }
    }

    // ── Folder operations ────────────────────────────────────────

    /// Create a folder under `parent_id` (or at the root).
    pub fn create_folder(&mut self, owner_id: OwnerId, req: CreateFolder) -> AppResult<Folder> {
        let name = validated_name(&req.name)?;

        if let Some(parent_id) = req.parent_id {
            if !self.folders.contains_key(&parent_id) {
                return Err(AppError::not_found("Parent folder not found"));
            }
        }
        self.check_sibling_name(&name, req.parent_id, None)?;

        let now = Utc::now();
        let folder = Folder {
            id: FolderId::new(),
            owner_id,
            name,
            parent_id: req.parent_id,
            created_at: now,
            updated_at: now,
        };
        self.folders.insert(folder.id, folder.clone());
        self.folder_order.push(folder.id);
        Ok(folder)
    }

    /// Rename a folder, keeping sibling names unique.
    pub fn rename_folder(&mut self, folder_id: FolderId, new_name: &str) -> AppResult<Folder> {
        let name = validated_name(new_name)?;

        let parent_id = self
            .folders
            .get(&folder_id)
            .ok_or_else(|| AppError::not_found("Folder not found"))?
            .parent_id;
        self.check_sibling_name(&name, parent_id, Some(folder_id))?;

        let folder = self
            .folders
            .get_mut(&folder_id)
            .ok_or_else(|| AppError::not_found("Folder not found"))?;
        folder.name = name;
        folder.updated_at = Utc::now();
        Ok(folder.clone())
    }

    /// Move a folder under a new parent (or to the root).
    ///
    /// Performs an ancestor walk from the target parent before mutating so
    /// a folder can never become its own descendant's child.
    pub fn move_folder(
        &mut self,
        folder_id: FolderId,
        new_parent_id: Option<FolderId>,
    ) -> AppResult<Folder> {
        let name = self
            .folders
            .get(&folder_id)
            .ok_or_else(|| AppError::not_found("Folder not found"))?
            .name
            .clone();

        if let Some(parent_id) = new_parent_id {
            if parent_id == folder_id {
                return Err(AppError::cycle_detected("Cannot move a folder into itself"));
            }
            if !self.folders.contains_key(&parent_id) {
                return Err(AppError::not_found("Target folder not found"));
            }
            if self.is_descendant(parent_id, folder_id)? {
                return Err(AppError::cycle_detected(
                    "Cannot move a folder into one of its descendants",
                ));
            }
        }
        self.check_sibling_name(&name, new_parent_id, Some(folder_id))?;

        let folder = self
            .folders
            .get_mut(&folder_id)
            .ok_or_else(|| AppError::not_found("Folder not found"))?;
        folder.parent_id = new_parent_id;
        folder.updated_at = Utc::now();
        Ok(folder.clone())
    }

    /// Delete a folder and its entire descendant subtree, children before
    /// parent, in one pass. Returns the content keys released by the
    /// deleted files so the caller can free them in the content store.
    pub fn delete_folder(&mut self, folder_id: FolderId) -> AppResult<Vec<ContentKey>> {
        if !self.folders.contains_key(&folder_id) {
            return Err(AppError::not_found("Folder not found"));
        }

        // Every child precedes its parent, so no dangling parent reference
        // is ever observable mid-cascade.
        let ordered = self.collect_subtree(folder_id);

        let mut released = Vec::new();
        for id in &ordered {
            let doomed: Vec<FileId> = self
                .file_order
                .iter()
                .copied()
                .filter(|fid| {
                    self.files
                        .get(fid)
                        .is_some_and(|f| f.folder_id == Some(*id))
                })
                .collect();
            for fid in doomed {
                if let Some(file) = self.files.remove(&fid) {
                    released.push(file.content_key);
                }
            }
            self.folders.remove(id);
        }
        self.file_order.retain(|fid| self.files.contains_key(fid));
        self.folder_order
            .retain(|fid| self.folders.contains_key(fid));
        Ok(released)
    }

    /// Get a folder by ID.
    pub fn get_folder(&self, folder_id: FolderId) -> AppResult<Folder> {
        self.folders
            .get(&folder_id)
            .cloned()
            .ok_or_else(|| AppError::not_found("Folder not found"))
    }

    /// List immediate children of a folder (or of the root), in insertion
    /// order.
    pub fn list_children(
        &self,
        parent_id: Option<FolderId>,
    ) -> AppResult<(Vec<Folder>, Vec<File>)> {
        if let Some(parent_id) = parent_id {
            if !self.folders.contains_key(&parent_id) {
                return Err(AppError::not_found("Folder not found"));
            }
        }

        let folders = self
            .folder_order
            .iter()
            .filter_map(|id| self.folders.get(id))
            .filter(|f| f.parent_id == parent_id)
            .cloned()
            .collect();
        let files = self
            .file_order
            .iter()
            .filter_map(|id| self.files.get(id))
            .filter(|f| f.folder_id == parent_id)
            .cloned()
            .collect();
        Ok((folders, files))
    }

    /// Resolve the root-to-target breadcrumb for a folder.
    ///
    /// A broken parent link cannot occur while the mutation invariants
    /// hold, so it surfaces as a fatal integrity error rather than a
    /// normal not-found.
    pub fn resolve_path(&self, folder_id: FolderId) -> AppResult<Vec<Folder>> {
        let mut crumb = Vec::new();
        let mut current = Some(
            self.folders
                .get(&folder_id)
                .cloned()
                .ok_or_else(|| AppError::not_found("Folder not found"))?,
        );

        while let Some(folder) = current {
            if crumb.len() > self.folders.len() {
                return Err(AppError::integrity(format!(
                    "Parent chain of folder {folder_id} does not terminate"
                )));
            }
            let parent_id = folder.parent_id;
            crumb.push(folder);
            current = match parent_id {
                Some(pid) => Some(self.folders.get(&pid).cloned().ok_or_else(|| {
                    AppError::integrity(format!(
                        "Folder {pid} is referenced as a parent but does not exist"
                    ))
                })?),
                None => None,
            };
        }

        crumb.reverse();
        Ok(crumb)
    }

    /// Snapshot every record the owner holds, insertion-ordered.
    pub fn owner_tree(&self) -> OwnerTree {
        OwnerTree {
            folders: self
                .folder_order
                .iter()
                .filter_map(|id| self.folders.get(id))
                .cloned()
                .collect(),
            files: self
                .file_order
                .iter()
                .filter_map(|id| self.files.get(id))
                .cloned()
                .collect(),
        }
    }

    // ── File operations ──────────────────────────────────────────

    /// Insert a file record whose content has already been written.
    ///
    /// Duplicate names within a folder are permitted for files; they
    /// disambiguate by ID.
    pub fn insert_file(&mut self, owner_id: OwnerId, req: CreateFile) -> AppResult<File> {
        let name = validated_name(&req.name)?;

        if let Some(folder_id) = req.folder_id {
            if !self.folders.contains_key(&folder_id) {
                return Err(AppError::not_found("Target folder not found"));
            }
        }

        let now = Utc::now();
        let file = File {
            id: FileId::new(),
            owner_id,
            name,
            folder_id: req.folder_id,
            size: req.size,
            mime_type: req.mime_type,
            content_key: req.content_key,
            starred: false,
            created_at: now,
            updated_at: now,
        };
        self.files.insert(file.id, file.clone());
        self.file_order.push(file.id);
        Ok(file)
    }

    /// Get a file by ID.
    pub fn get_file(&self, file_id: FileId) -> AppResult<File> {
        self.files
            .get(&file_id)
            .cloned()
            .ok_or_else(|| AppError::not_found("File not found"))
    }

    /// Rename a file (metadata only).
    pub fn rename_file(&mut self, file_id: FileId, new_name: &str) -> AppResult<File> {
        let name = validated_name(new_name)?;
        let file = self
            .files
            .get_mut(&file_id)
            .ok_or_else(|| AppError::not_found("File not found"))?;
        file.name = name;
        file.updated_at = Utc::now();
        Ok(file.clone())
    }

    /// Bind a new content key to a file, returning the released old key.
    pub fn set_file_content(
        &mut self,
        file_id: FileId,
        content_key: ContentKey,
        size: u64,
        mime_type: String,
    ) -> AppResult<(File, ContentKey)> {
        let file = self
            .files
            .get_mut(&file_id)
            .ok_or_else(|| AppError::not_found("File not found"))?;
        let old_key = file.content_key;
        file.content_key = content_key;
        file.size = size;
        file.mime_type = mime_type;
        file.updated_at = Utc::now();
        Ok((file.clone(), old_key))
    }

    /// Flip the starred flag.
    pub fn toggle_star(&mut self, file_id: FileId) -> AppResult<File> {
        let file = self
            .files
            .get_mut(&file_id)
            .ok_or_else(|| AppError::not_found("File not found"))?;
        file.starred = !file.starred;
        file.updated_at = Utc::now();
        Ok(file.clone())
    }

    /// Remove a file record, returning it so the caller can release its
    /// content key.
    pub fn delete_file(&mut self, file_id: FileId) -> AppResult<File> {
        let file = self
            .files
            .remove(&file_id)
            .ok_or_else(|| AppError::not_found("File not found"))?;
        self.file_order.retain(|id| *id != file_id);
        Ok(file)
    }

    // ── Invariant helpers ────────────────────────────────────────

    /// Whether `candidate` sits somewhere below `ancestor`.
    fn is_descendant(&self, candidate: FolderId, ancestor: FolderId) -> AppResult<bool> {
        let mut current = Some(candidate);
        let mut steps = 0usize;
        while let Some(id) = current {
            if id == ancestor {
                return Ok(true);
            }
            steps += 1;
            if steps > self.folders.len() {
                return Err(AppError::integrity(format!(
                    "Parent chain of folder {candidate} does not terminate"
                )));
            }
            current = self
                .folders
                .get(&id)
                .ok_or_else(|| {
                    AppError::integrity(format!(
                        "Folder {id} is referenced as a parent but does not exist"
                    ))
                })?
                .parent_id;
        }
        Ok(false)
    }

    /// Enforce sibling-name uniqueness under `parent_id`, optionally
    /// excluding the folder being renamed or moved.
    fn check_sibling_name(
        &self,
        name: &str,
        parent_id: Option<FolderId>,
        exclude: Option<FolderId>,
    ) -> AppResult<()> {
        let conflict = self.folders.values().any(|f| {
            f.parent_id == parent_id && f.name == name && Some(f.id) != exclude
        });
        if conflict {
            return Err(AppError::name_conflict(format!(
                "A folder named '{name}' already exists here"
            )));
        }
        Ok(())
    }

    /// Collect `root` and every descendant, ordered children before
    /// parents. Uses an explicit work list rather than recursion, so
    /// nesting depth never grows the call stack.
    fn collect_subtree(&self, root: FolderId) -> Vec<FolderId> {
        let mut children: HashMap<FolderId, Vec<FolderId>> = HashMap::new();
        for id in &self.folder_order {
            if let Some(parent) = self.folders.get(id).and_then(|f| f.parent_id) {
                children.entry(parent).or_default().push(*id);
            }
        }

        // Breadth-first: every folder lands after its parent, so the
        // reversed list puts children first.
        let mut ordered = vec![root];
        let mut cursor = 0;
        while cursor < ordered.len() {
            if let Some(kids) = children.get(&ordered[cursor]) {
                ordered.extend(kids.iter().copied());
            }
            cursor += 1;
        }
        ordered.reverse();
        ordered
    }
}

/// Reject empty or whitespace-only names.
fn validated_name(name: &str) -> AppResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("Name cannot be empty"));
    }
    Ok(trimmed.to_string())
}
