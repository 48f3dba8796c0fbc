//! File upload, download, preview, and metadata handlers.

use axum::Json;
use axum::body::Body;
use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::Response;
use futures::{StreamExt, TryStreamExt};

use vault_core::error::AppError;
use vault_core::types::{FileId, FolderId};
use vault_entity::file::File;
use vault_service::file::{ByteRange, FileStream, UploadParams};

use crate::dto::request::RenameRequest;
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, Path};
use crate::state::AppState;

/// POST /api/files — multipart upload
///
/// The `file` part is streamed straight into the content store, never
/// materialized in memory, so a `folder_id` part must precede it.
pub async fn upload_file(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> ApiResult<Json<ApiResponse<File>>> {
    let mut folder_id: Option<FolderId> = None;
    let mut uploaded: Option<File> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "folder_id" => {
                // The file part is consumed as a stream the moment it is
                // seen, so a folder_id arriving after it can no longer
                // apply. Undo the committed record and refuse.
                if let Some(file) = uploaded.take() {
                    state.file_service.delete_file(auth.context(), file.id).await?;
                    return Err(
                        AppError::validation("folder_id must precede the file part").into(),
                    );
                }
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::validation(format!("Read error: {e}")))?;
                folder_id = Some(
                    text.parse()
                        .map_err(|_| AppError::validation("Invalid folder_id"))?,
                );
            }
            "file" => {
                let file_name = field
                    .file_name()
                    .map(String::from)
                    .ok_or_else(|| AppError::validation("file part needs a filename"))?;
                let declared_mime = field.content_type().map(String::from);
                let content = field.map_err(std::io::Error::other).boxed();

                let file = state
                    .file_service
                    .upload(
                        auth.context(),
                        UploadParams {
                            name: file_name,
                            folder_id,
                            declared_mime,
                            content,
                        },
                    )
                    .await?;
                uploaded = Some(file);
            }
            _ => {}
        }
    }

    let file = uploaded.ok_or_else(|| AppError::validation("file part is required"))?;
    Ok(Json(ApiResponse::ok(file)))
}

/// GET /api/files/{id}/download
pub async fn download_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<FileId>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let range = parse_range_header(&headers);
    let out = state
        .file_service
        .open_stream(auth.context(), id, range)
        .await?;
    let disposition = format!("attachment; filename=\"{}\"", sanitize_filename(&out.file.name));
    stream_response(out, disposition)
}

/// GET /api/files/{id}/preview
pub async fn preview_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<FileId>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let range = parse_range_header(&headers);
    let out = state
        .file_service
        .open_stream(auth.context(), id, range)
        .await?;
    stream_response(out, "inline".to_string())
}

/// GET /api/files/{id}
pub async fn get_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<FileId>,
) -> ApiResult<Json<ApiResponse<File>>> {
    let file = state.file_service.get_file(auth.context(), id)?;
    Ok(Json(ApiResponse::ok(file)))
}

/// PUT /api/files/{id}
pub async fn rename_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<FileId>,
    Json(req): Json<RenameRequest>,
) -> ApiResult<Json<ApiResponse<File>>> {
    let file = state
        .file_service
        .rename_file(auth.context(), id, &req.name)
        .await?;
    Ok(Json(ApiResponse::ok(file)))
}

/// PUT /api/files/{id}/content — raw body replaces the stored content
pub async fn replace_content(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<FileId>,
    headers: HeaderMap,
    body: Body,
) -> ApiResult<Json<ApiResponse<File>>> {
    let declared_mime = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let stream = body.into_data_stream().map_err(std::io::Error::other);

    let file = state
        .file_service
        .replace_content(auth.context(), id, Box::pin(stream), declared_mime)
        .await?;
    Ok(Json(ApiResponse::ok(file)))
}

/// PUT /api/files/{id}/star
pub async fn toggle_star(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<FileId>,
) -> ApiResult<Json<ApiResponse<File>>> {
    let file = state.file_service.toggle_star(auth.context(), id).await?;
    Ok(Json(ApiResponse::ok(file)))
}

/// DELETE /api/files/{id}
pub async fn delete_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<FileId>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.file_service.delete_file(auth.context(), id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "File deleted".to_string(),
    })))
}

/// Builds a streaming response around an open content stream, emitting
/// 206 with a `Content-Range` header when a range was served.
fn stream_response(out: FileStream, disposition: String) -> ApiResult<Response> {
    let mut builder = Response::builder()
        .header(header::CONTENT_TYPE, out.file.mime_type.clone())
        .header(header::CONTENT_DISPOSITION, disposition)
        .header(header::CONTENT_LENGTH, out.content_length)
        .header(header::ACCEPT_RANGES, "bytes");

    builder = match out.range {
        Some((first, last, total)) => builder
            .status(StatusCode::PARTIAL_CONTENT)
            .header(header::CONTENT_RANGE, format!("bytes {first}-{last}/{total}")),
        None => builder.status(StatusCode::OK),
    };

    let response = builder
        .body(Body::from_stream(out.stream))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")))?;
    Ok(response)
}

/// Parses a `Range: bytes=...` header. Malformed or multi-part ranges are
/// ignored per RFC 9110 (the full content is served instead).
fn parse_range_header(headers: &HeaderMap) -> Option<ByteRange> {
    let value = headers.get(header::RANGE)?.to_str().ok()?;
    let spec = value.strip_prefix("bytes=")?;
    if spec.contains(',') {
        return None;
    }
    let (start, end) = spec.split_once('-')?;

    let start = if start.is_empty() {
        None
    } else {
        Some(start.trim().parse::<u64>().ok()?)
    };
    let end = if end.is_empty() {
        None
    } else {
        Some(end.trim().parse::<u64>().ok()?)
    };
    if start.is_none() && end.is_none() {
        return None;
    }
    Some(ByteRange { start, end })
}

/// Strips characters that would break the quoted filename parameter.
fn sanitize_filename(name: &str) -> String {
    name.replace(['"', '\r', '\n'], "_")
}
