//! `AuthUser` extractor — pulls the bearer token from the Authorization
//! header, validates it, and injects the request context.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use vault_core::error::AppError;
use vault_service::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Extracted authenticated owner context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl AuthUser {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::authentication("Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::authentication("Invalid Authorization header format"))?;

        let claims = state.jwt_decoder.decode_token(token)?;

        Ok(AuthUser(RequestContext::new(
            claims.owner_id(),
            claims.username,
        )))
    }
}
