//! Route definitions for the Secure Vault HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via Axum's
//! `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let max_upload = state.config.storage.max_upload_size_bytes as usize;

    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(tree_routes())
        .merge(folder_routes())
        .merge(file_routes())
        .merge(health_routes());

    let cors = build_cors_layer(&state);

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Auth endpoints: register, login, me
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/me", get(handlers::auth::me))
}

/// Whole-tree listing
fn tree_routes() -> Router<AppState> {
    Router::new().route("/data", get(handlers::tree::get_data))
}

/// Folder CRUD, move, children, breadcrumb
fn folder_routes() -> Router<AppState> {
    Router::new()
        .route("/folders", post(handlers::folder::create_folder))
        .route("/folders/{id}", put(handlers::folder::rename_folder))
        .route("/folders/{id}", delete(handlers::folder::delete_folder))
        .route("/folders/{id}/move", put(handlers::folder::move_folder))
        .route(
            "/folders/{id}/children",
            get(handlers::folder::list_children),
        )
        .route("/folders/{id}/path", get(handlers::folder::resolve_path))
}

/// File upload, download, preview, metadata
fn file_routes() -> Router<AppState> {
    Router::new()
        .route("/files", post(handlers::file::upload_file))
        .route("/files/{id}", get(handlers::file::get_file))
        .route("/files/{id}", put(handlers::file::rename_file))
        .route("/files/{id}", delete(handlers::file::delete_file))
        .route("/files/{id}/download", get(handlers::file::download_file))
        .route("/files/{id}/preview", get(handlers::file::preview_file))
        .route("/files/{id}/content", put(handlers::file::replace_content))
        .route("/files/{id}/star", put(handlers::file::toggle_star))
}

/// Health check endpoint (no auth required)
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Build CORS layer from configuration
fn build_cors_layer(state: &AppState) -> CorsLayer {
    use http::Method;
    use tower_http::cors::Any;

    let cors_config = &state.config.server.cors;

    let mut cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    if cors_config.allowed_origins.contains(&"*".to_string()) {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<http::HeaderValue> = cors_config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    cors
}
