//! Request context carrying the authenticated owner.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vault_core::types::OwnerId;

/// Context for the current authenticated request.
///
/// Extracted by the transport layer from the identity token and passed
/// into every service method, so the core stays testable without any HTTP
/// machinery and never relies on ambient session state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated owner's ID; the isolation boundary for every
    /// operation performed under this context.
    pub owner_id: OwnerId,
    /// The username (convenience field from the token claims).
    pub username: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(owner_id: OwnerId, username: String) -> Self {
        Self {
            owner_id,
            username,
            request_time: Utc::now(),
        }
    }
}
