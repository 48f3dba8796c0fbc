//! Authentication and token configuration.

use serde::{Deserialize, Serialize};

/// Authentication configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret used to sign identity tokens. Must be set per
    /// deployment; there is no usable default.
    pub jwt_secret: String,
    /// Identity token time-to-live in hours.
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: u64,
    /// Minimum accepted password length at registration.
    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,
}

fn default_token_ttl_hours() -> u64 {
    24
}

fn default_min_password_length() -> usize {
    8
}
