//! Path extraction with the API's JSON error contract.

use crate::web::response::error_response;
use axum::async_trait;
use axum::extract::{FromRequestParts, Path};
use axum::http::{request::Parts, StatusCode};
use axum::response::Response;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Like [`Path`], but a segment that cannot be decoded (e.g. invalid UTF-8
/// after percent-decoding) names no resource and yields the JSON 404 instead
/// of axum's plain-text 400.
#[derive(Debug)]
pub struct ResourcePath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ResourcePath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => {
                debug!(uri = %parts.uri, error = %rejection, "Undecodable path");
                Err(error_response(StatusCode::NOT_FOUND, "resource not found"))
            }
        }
    }
}
