//! Folder CRUD, move, children, and breadcrumb handlers.

use axum::Json;
use axum::extract::State;

use vault_core::types::FolderId;
use vault_entity::folder::{CreateFolder, Folder};

use crate::dto::request::{CreateFolderRequest, MoveFolderRequest, RenameRequest};
use crate::dto::response::{ApiResponse, ChildrenResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, Path};
use crate::state::AppState;

/// POST /api/folders
pub async fn create_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateFolderRequest>,
) -> ApiResult<Json<ApiResponse<Folder>>> {
    let folder = state
        .folder_service
        .create_folder(
            auth.context(),
            CreateFolder {
                name: req.name,
                parent_id: req.parent_id,
            },
        )
        .await?;
    Ok(Json(ApiResponse::ok(folder)))
}

/// PUT /api/folders/{id}
pub async fn rename_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<FolderId>,
    Json(req): Json<RenameRequest>,
) -> ApiResult<Json<ApiResponse<Folder>>> {
    let folder = state
        .folder_service
        .rename_folder(auth.context(), id, &req.name)
        .await?;
    Ok(Json(ApiResponse::ok(folder)))
}

/// PUT /api/folders/{id}/move
pub async fn move_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<FolderId>,
    Json(req): Json<MoveFolderRequest>,
) -> ApiResult<Json<ApiResponse<Folder>>> {
    let folder = state
        .folder_service
        .move_folder(auth.context(), id, req.new_parent_id)
        .await?;
    Ok(Json(ApiResponse::ok(folder)))
}

/// GET /api/folders/{id}/children
pub async fn list_children(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<FolderId>,
) -> ApiResult<Json<ApiResponse<ChildrenResponse>>> {
    let (folders, files) = state
        .folder_service
        .list_children(auth.context(), Some(id))?;
    Ok(Json(ApiResponse::ok(ChildrenResponse { folders, files })))
}

/// GET /api/folders/{id}/path
pub async fn resolve_path(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<FolderId>,
) -> ApiResult<Json<ApiResponse<Vec<Folder>>>> {
    let breadcrumb = state.folder_service.resolve_path(auth.context(), id)?;
    Ok(Json(ApiResponse::ok(breadcrumb)))
}

/// DELETE /api/folders/{id}
pub async fn delete_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<FolderId>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.folder_service.delete_folder(auth.context(), id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Folder deleted".to_string(),
    })))
}
