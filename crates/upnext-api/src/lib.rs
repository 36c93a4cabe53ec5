//! HTTP API for the UpNext catalog.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **Artist endpoints** for the artist catalog and each artist's
//!   upcoming or past events
//! - **Event endpoints** for the event catalog
//! - **List endpoints** for user lists, the service-owned `Attended` list,
//!   and the events placed in each list
//!
//! # Architecture
//!
//! Handlers share one [`AppState`] holding an `Arc<dyn DocumentStore>`
//! (see [`upnext_db`]). Request paths are normalized to their non-empty
//! segments before routing, CORS allows any origin, and every `OPTIONS`
//! request answers `204`.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod paths;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use router::{build_app, build_router, App};
pub use server::{serve, start_server, ServerConfig, ServerError};
pub use startup::{bootstrap, ensure_system_lists};
pub use state::AppState;
