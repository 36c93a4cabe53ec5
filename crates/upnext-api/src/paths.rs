//! Request path normalization.
//!
//! Paths are reduced to their non-empty segments before routing, so
//! `//lists/`, `/lists/` and `/lists` all reach the same handler.

use axum::extract::Request;
use axum::http::uri::{PathAndQuery, Uri};

/// Split a path into its non-empty segments, in order.
pub fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|segment| !segment.is_empty()).collect()
}

/// `/` followed by the path's segments joined with `/`.
pub fn normalize_path(path: &str) -> String {
    format!("/{}", split_segments(path).join("/"))
}

/// Rewrite a request's URI to its normalized path, keeping the query.
///
/// A request whose rewritten URI would not parse is passed through as-is.
pub fn normalize_request(mut request: Request) -> Request {
    let normalized = normalize_path(request.uri().path());
    if normalized == request.uri().path() {
        return request;
    }

    let path_and_query = match request.uri().query() {
        Some(query) => format!("{normalized}?{query}"),
        None => normalized,
    };

    let Ok(path_and_query) = PathAndQuery::try_from(path_and_query) else {
        return request;
    };
    let mut parts = request.uri().clone().into_parts();
    parts.path_and_query = Some(path_and_query);
    if let Ok(uri) = Uri::from_parts(parts) {
        *request.uri_mut() = uri;
    }
    request
}
