//! # vault-auth
//!
//! The identity provider collaborator: issues and verifies opaque signed
//! identity tokens carrying exactly one attribute the storage core cares
//! about — the `owner_id`. Also hosts Argon2id credential hashing and the
//! persisted user registry behind it.

pub mod jwt;
pub mod password;
pub mod registry;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use registry::UserRegistry;
