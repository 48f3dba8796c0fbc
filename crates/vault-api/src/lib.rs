//! # vault-api
//!
//! HTTP API layer for Secure Vault built on Axum.
//!
//! Provides the REST endpoints, the bearer-token extractor, DTOs, and the
//! mapping from domain errors to HTTP responses. Handlers translate
//! requests into storage-core calls and never touch the index or content
//! store directly.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use app::{build_app, build_state, run_server};
pub use state::AppState;
