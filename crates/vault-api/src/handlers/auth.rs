//! Auth handlers — register, login, me.

use axum::Json;
use axum::extract::State;

use vault_entity::user::UserProfile;

use crate::dto::request::CredentialsRequest;
use crate::dto::response::{ApiResponse, AuthResponse};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> ApiResult<Json<ApiResponse<AuthResponse>>> {
    let user = state.registry.register(&req.username, &req.password).await?;
    let token = state.jwt_encoder.generate_token(user.id, &user.username)?;

    Ok(Json(ApiResponse::ok(AuthResponse {
        token,
        user: UserProfile::from(&user),
    })))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> ApiResult<Json<ApiResponse<AuthResponse>>> {
    let user = state
        .registry
        .verify_credentials(&req.username, &req.password)?;
    let token = state.jwt_encoder.generate_token(user.id, &user.username)?;

    Ok(Json(ApiResponse::ok(AuthResponse {
        token,
        user: UserProfile::from(&user),
    })))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<UserProfile>>> {
    let profile = state.registry.profile(auth.owner_id)?;
    Ok(Json(ApiResponse::ok(profile)))
}
