//! Unified application error types for Secure Vault.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The requested resource was not found, or is owned by another user.
    ///
    /// Both cases produce the same kind so that a caller can never learn
    /// whether a foreign resource exists.
    NotFound,
    /// Authentication failed (missing, invalid, or expired token).
    Authentication,
    /// Input validation failed.
    Validation,
    /// A sibling folder with the same name already exists.
    NameConflict,
    /// A folder move would make the folder its own descendant.
    CycleDetected,
    /// A content stream failed mid-transfer during upload or replace.
    ContentTransfer,
    /// The tree index and content store disagree (broken parent chain,
    /// orphaned content key). Indicates a prior bug; never recovered silently.
    Integrity,
    /// A content store I/O error occurred.
    Storage,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal server error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Authentication => write!(f, "AUTHENTICATION_REQUIRED"),
            Self::Validation => write!(f, "VALIDATION_ERROR"),
            Self::NameConflict => write!(f, "NAME_CONFLICT"),
            Self::CycleDetected => write!(f, "CYCLE_DETECTED"),
            Self::ContentTransfer => write!(f, "CONTENT_TRANSFER_FAILED"),
            Self::Integrity => write!(f, "INTEGRITY_VIOLATION"),
            Self::Storage => write!(f, "STORAGE_ERROR"),
            Self::Configuration => write!(f, "CONFIGURATION_ERROR"),
            Self::Serialization => write!(f, "SERIALIZATION_ERROR"),
            Self::Internal => write!(f, "INTERNAL_ERROR"),
        }
    }
}

/// The unified application error used throughout Secure Vault.
///
/// All crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls. This provides a single error type for
/// the entire application boundary.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authentication, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a sibling name conflict error.
    pub fn name_conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NameConflict, message)
    }

    /// Create a cycle-detected error.
    pub fn cycle_detected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CycleDetected, message)
    }

    /// Create a content transfer error.
    pub fn content_transfer(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ContentTransfer, message)
    }

    /// Create an integrity violation error.
    pub fn integrity(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Integrity, message)
    }

    /// Create a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Storage, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Storage, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
