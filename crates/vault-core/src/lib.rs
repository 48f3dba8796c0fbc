//! # vault-core
//!
//! Core crate for Secure Vault. Contains typed identifiers, configuration
//! schemas, the content store trait, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Vault crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
