//! Owner-tree snapshot returned by the "load everything once" query.

use serde::{Deserialize, Serialize};

use crate::file::File;
use crate::folder::Folder;

/// A read-only snapshot of one owner's complete folder and file set.
///
/// Carries no isolation stronger than read-committed: a client may observe
/// a tree that changes moments later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerTree {
    /// Every folder belonging to the owner, insertion-ordered.
    pub folders: Vec<Folder>,
    /// Every file belonging to the owner, insertion-ordered.
    pub files: Vec<File>,
}

impl OwnerTree {
    /// Create an empty tree snapshot.
    pub fn empty() -> Self {
        Self {
            folders: Vec::new(),
            files: Vec::new(),
        }
    }
}
