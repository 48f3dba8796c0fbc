//! Shared domain types.

pub mod id;

pub use id::{ContentKey, FileId, FolderId, OwnerId};
