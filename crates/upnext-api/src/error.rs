//! Error types for the catalog API.
//!
//! [`ApiError`] unifies all handler failure modes into a single enum that
//! can be converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.
//!
//! Client mistakes answer `400` and store failures `500`, both with an
//! `{"error": message}` body. A missing resource answers a bare `404`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use upnext_db::DbError;
use upnext_types::IdError;

/// Errors that can occur in the API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The requested resource does not exist.
    #[error("not found")]
    NotFound,

    /// The request is well-formed JSON but not acceptable.
    #[error("{0}")]
    BadRequest(String),

    /// The request body is not valid JSON for the endpoint.
    #[error("malformed body: {0}")]
    MalformedBody(#[from] serde_json::Error),

    /// An identifier in the path or body is not a valid `ObjectId`.
    #[error(transparent)]
    InvalidId(#[from] IdError),

    /// The document store failed or timed out.
    #[error(transparent)]
    Store(#[from] DbError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::NotFound => return StatusCode::NOT_FOUND.into_response(),
            Self::BadRequest(_) | Self::MalformedBody(_) | Self::InvalidId(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Store(e) => {
                tracing::error!(error = %e, "Store operation failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = serde_json::json!({ "error": self.to_string() });

        (status, axum::Json(body)).into_response()
    }
}
