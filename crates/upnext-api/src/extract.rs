//! Request extractors that reject with [`ApiError`].
//!
//! axum's own `Path` and `Query` answer rejections in plain text; these
//! wrappers turn them into the API's `{"error": message}` 400 responses.

use std::str::FromStr;

use axum::extract::{FromRequestParts, Path, Query};
use axum::http::request::Parts;
use upnext_types::{EventWindow, IdError};

use crate::error::ApiError;

/// The single `{id}` path parameter, parsed as an `ObjectId`-backed id.
#[derive(Debug, Clone, Copy)]
pub struct IdPath<T>(pub T);

impl<S, T> FromRequestParts<S> for IdPath<T>
where
    S: Send + Sync,
    T: FromStr<Err = IdError> + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        Ok(Self(raw.parse()?))
    }
}

/// The event window selected by the `past` query parameter.
///
/// Only the first `past` value counts; `past=true` selects past events and
/// anything else, or no parameter, upcoming ones.
#[derive(Debug, Clone, Copy)]
pub struct WindowParam(pub EventWindow);

impl<S> FromRequestParts<S> for WindowParam
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        let past = pairs
            .into_iter()
            .find(|(key, _)| key == "past")
            .map(|(_, value)| value);
        Ok(Self(EventWindow::from_past_param(past.as_deref())))
    }
}
