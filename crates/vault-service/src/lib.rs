//! # vault-service
//!
//! The storage core: owns all mutation and query logic over the tree index
//! and the content store, scoped to the authenticated owner carried in
//! every [`RequestContext`]. The transport layer maps requests onto these
//! services and never touches the index or store directly.
//!
//! [`RequestContext`]: context::RequestContext

pub mod context;
pub mod file;
pub mod folder;
pub mod tree;

pub use context::RequestContext;
pub use file::FileService;
pub use folder::FolderService;
pub use tree::TreeService;
