//! Full-tree handler.

use axum::Json;
use axum::extract::State;

use vault_entity::tree::OwnerTree;

use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/data
pub async fn get_data(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<OwnerTree>>> {
    let tree = state.tree_service.owner_tree(auth.context())?;
    Ok(Json(ApiResponse::ok(tree)))
}
