//! # vault-entity
//!
//! Domain entity models for Secure Vault: users, folders, files, and the
//! owner-tree snapshot used by the "load everything once" client pattern.

pub mod file;
pub mod folder;
pub mod tree;
pub mod user;
