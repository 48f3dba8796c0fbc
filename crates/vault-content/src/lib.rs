//! # vault-content
//!
//! Content store implementation: durable byte storage addressed by opaque
//! [`ContentKey`]s, decoupled from logical file names and paths. The store
//! is not owner-aware — every ownership check happens in the storage core
//! before a key reaches this crate.
//!
//! [`ContentKey`]: vault_core::types::ContentKey

pub mod local;

pub use local::LocalContentStore;
