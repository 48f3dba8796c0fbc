//! Application builder — wires state + router into a runnable Axum app.

use std::sync::Arc;

use axum::Router;

use vault_auth::jwt::{JwtDecoder, JwtEncoder};
use vault_auth::registry::UserRegistry;
use vault_content::LocalContentStore;
use vault_core::config::AppConfig;
use vault_core::error::AppError;
use vault_core::traits::content::ContentStore;
use vault_index::TreeIndex;
use vault_service::{FileService, FolderService, TreeService};

use crate::router::build_router;
use crate::state::AppState;

/// Opens the tree index, content store, and user registry, and wires them
/// into the shared application state.
pub async fn build_state(config: AppConfig) -> Result<AppState, AppError> {
    let index = Arc::new(TreeIndex::open(&config.storage.index_path).await?);
    let content: Arc<dyn ContentStore> =
        Arc::new(LocalContentStore::new(&config.storage.data_dir).await?);
    let registry = Arc::new(UserRegistry::open(&config.storage.users_path, &config.auth).await?);

    let jwt_encoder = Arc::new(JwtEncoder::new(&config.auth));
    let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));

    let folder_service = Arc::new(FolderService::new(Arc::clone(&index), Arc::clone(&content)));
    let file_service = Arc::new(FileService::new(Arc::clone(&index), Arc::clone(&content)));
    let tree_service = Arc::new(TreeService::new(Arc::clone(&index)));

    Ok(AppState {
        config: Arc::new(config),
        registry,
        jwt_encoder,
        jwt_decoder,
        folder_service,
        file_service,
        tree_service,
    })
}

/// Builds the complete Axum application from the shared state.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Runs the Secure Vault server with the given configuration.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = build_state(config).await?;
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Secure Vault server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
    }
}
