//! Axum router construction for the catalog API.
//!
//! Assembles all routes into a single [`Router`] with CORS enabled, then
//! wraps it so request paths are normalized before routing.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::Request;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use tower::util::MapRequest;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::paths::normalize_request;
use crate::state::AppState;

/// The servable application: the router behind path normalization.
pub type App = MapRequest<Router, fn(Request) -> Request>;

/// Build the complete Axum router for the catalog API.
///
/// The router includes:
/// - `GET /health` -- liveness
/// - `GET /artists`, `GET /artists/{id}`, `GET /artists/{id}/events`
/// - `GET /events`, `GET /events/{id}`
/// - `GET|POST /lists`, `GET /lists/{id}`, `GET|POST /lists/{id}/items`
///
/// Unknown paths answer `404` and known paths with an unsupported method
/// `405`, both without a body. Every `OPTIONS` request answers `204`.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(AllowMethods::list([Method::GET, Method::POST, Method::OPTIONS]))
        .allow_headers(AllowHeaders::list([header::CONTENT_TYPE]));

    Router::new()
        .route("/health", get(handlers::health))
        // Artists
        .route("/artists", get(handlers::list_artists))
        .route("/artists/{id}", get(handlers::get_artist))
        .route("/artists/{id}/events", get(handlers::list_artist_events))
        // Events
        .route("/events", get(handlers::list_events))
        .route("/events/{id}", get(handlers::get_event))
        // Lists
        .route("/lists", get(handlers::list_lists).post(handlers::create_list))
        .route("/lists/{id}", get(handlers::get_list))
        .route(
            "/lists/{id}/items",
            get(handlers::list_items).post(handlers::add_list_item),
        )
        .layer(cors)
        .layer(middleware::from_fn(answer_options))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Build the router and put path normalization in front of it.
///
/// Normalization has to happen outside the [`Router`], since a layer added
/// with [`Router::layer`] runs after the route has been chosen.
pub fn build_app(state: Arc<AppState>) -> App {
    MapRequest::new(build_router(state), normalize_request as fn(Request) -> Request)
}

/// Answer every `OPTIONS` request with `204` and an empty body.
///
/// The CORS layer still runs first, so preflight responses keep their
/// `Access-Control-*` headers.
async fn answer_options(request: Request, next: Next) -> Response {
    if request.method() != Method::OPTIONS {
        return next.run(request).await;
    }

    let (mut parts, _) = next.run(request).await.into_parts();
    parts.status = StatusCode::NO_CONTENT;
    parts.headers.remove(header::CONTENT_TYPE);
    parts.headers.remove(header::CONTENT_LENGTH);
    if !parts.headers.contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN) {
        parts
            .headers
            .insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    }
    Response::from_parts(parts, Body::empty())
}
