//! Custom Axum extractors.

pub mod auth;
pub mod path;

pub use auth::AuthUser;
pub use path::Path;
