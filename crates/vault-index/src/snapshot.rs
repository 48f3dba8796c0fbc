//! Atomic JSON snapshot persistence for the tree index.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

use vault_core::error::{AppError, ErrorKind};
use vault_core::result::AppResult;
use vault_entity::file::File;
use vault_entity::folder::Folder;

/// On-disk representation of the whole index: a flat record dump.
/// Per-owner ordering within the vectors is the insertion order, so the
/// arena can be rebuilt exactly.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct IndexSnapshot {
    /// Every folder record across all owners.
    pub folders: Vec<Folder>,
    /// Every file record across all owners.
    pub files: Vec<File>,
}

/// Writes snapshots with a write-temp-then-rename so a crash mid-write
/// leaves the previous consistent snapshot intact.
#[derive(Debug)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    /// Create a store persisting to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The snapshot file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the snapshot, or `None` if the file does not exist yet.
    pub async fn load(&self) -> AppResult<Option<IndexSnapshot>> {
        match fs::read(&self.path).await {
            Ok(data) => {
                let snapshot: IndexSnapshot = serde_json::from_slice(&data).map_err(|e| {
                    AppError::with_source(
                        ErrorKind::Integrity,
                        format!("Corrupt index snapshot at {}", self.path.display()),
                        e,
                    )
                })?;
                debug!(
                    folders = snapshot.folders.len(),
                    files = snapshot.files.len(),
                    "Loaded index snapshot"
                );
                Ok(Some(snapshot))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to read index snapshot: {}", self.path.display()),
                e,
            )),
        }
    }

    /// Persist the snapshot atomically.
    pub async fn save(&self, snapshot: &IndexSnapshot) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create snapshot directory: {}", parent.display()),
                    e,
                )
            })?;
        }

        let data = serde_json::to_vec_pretty(snapshot)?;
        let tmp = self.path.with_extension("json.tmp");

        fs::write(&tmp, &data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write snapshot temp file: {}", tmp.display()),
                e,
            )
        })?;
        fs::rename(&tmp, &self.path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to commit snapshot: {}", self.path.display()),
                e,
            )
        })?;

        debug!(
            folders = snapshot.folders.len(),
            files = snapshot.files.len(),
            bytes = data.len(),
            "Persisted index snapshot"
        );
        Ok(())
    }
}
