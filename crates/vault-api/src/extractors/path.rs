//! `Path` extractor that reports malformed path parameters through the
//! unified error envelope instead of axum's plain-text rejection.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use vault_core::error::AppError;

use crate::error::ApiError;

/// Drop-in replacement for [`axum::extract::Path`] whose rejection is an
/// [`ApiError`], so a bad UUID in a route like `/api/files/{id}` yields
/// the same `{error, message}` body as every other validation failure.
#[derive(Debug, Clone, Copy)]
pub struct Path<T>(pub T);

impl<S, T> FromRequestParts<S> for Path<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match axum::extract::Path::<T>::from_request_parts(parts, state).await {
            Ok(axum::extract::Path(value)) => Ok(Self(value)),
            Err(rejection) => Err(AppError::validation(rejection.body_text()).into()),
        }
    }
}
