//! Traits implemented across the Vault crates.

pub mod content;

pub use content::{ByteSource, ByteStream, ContentStore};
