//! Data layer for the UpNext catalog API (`MongoDB`).
//!
//! `MongoDB` holds four collections. Artists and events are written by an
//! external ingestion process and are read-only here; lists and list items
//! are written through the API.
//!
//! # Architecture
//!
//! ```text
//! HTTP handler
//!     |
//!     +-- ArtistStore / EventStore / ListStore  (query builders + decoding)
//!             |
//!             +-- dyn DocumentStore
//!                     |-- MongoStore     (production)
//!                     +-- InMemoryStore  (tests, local runs)
//! ```
//!
//! Every store call runs under a deadline; an expired deadline surfaces as
//! [`DbError::Timeout`].
//!
//! # Modules
//!
//! - [`store`] -- The [`DocumentStore`] trait, collections and deadlines
//! - [`query`] -- Store-agnostic find and upsert descriptions
//! - [`mongo`] -- `MongoDB` connection, indexes and trait implementation
//! - [`memory`] -- In-process implementation of the query subset
//! - [`artist_store`] -- Artist list and detail
//! - [`event_store`] -- Event list, detail and per-artist windows
//! - [`list_store`] -- Lists, list items and the system list
//! - [`error`] -- Shared error types

pub mod artist_store;
pub mod error;
pub mod event_store;
pub mod list_store;
pub mod memory;
pub mod mongo;
pub mod query;
pub mod store;

// Re-export primary types for convenience.
pub use artist_store::{ArtistRow, ArtistStore};
pub use error::DbError;
pub use event_store::{EventRow, EventStore};
pub use list_store::{ListItemRow, ListRow, ListStore, NewListItem};
pub use memory::InMemoryStore;
pub use mongo::{MongoConfig, MongoStore};
pub use query::{FindQuery, InsertOnlyUpsert, UpsertOutcome};
pub use store::{with_deadline, Collection, DocumentStore, DEFAULT_REQUEST_TIMEOUT};
