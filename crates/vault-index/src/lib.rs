//! # vault-index
//!
//! The tree index: authoritative store of folder and file metadata and
//! their parent/child relationships, scoped per owner.
//!
//! Records live in an in-memory arena keyed by opaque identifiers with
//! explicit parent-id fields (no pointer links); cycle freedom is enforced
//! by an ancestor walk at move time, and sibling-name uniqueness at every
//! create/rename/move. Mutations are serialized per owner through a lazily
//! created lock registry, and the whole index is persisted as an atomic
//! JSON snapshot after every successful mutation.

mod arena;
mod locks;
mod snapshot;

pub mod index;

pub use index::TreeIndex;
pub use locks::OwnerLocks;
