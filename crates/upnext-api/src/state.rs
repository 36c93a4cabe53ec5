//! Shared application state for the catalog API.
//!
//! [`AppState`] holds the document store every handler reads and writes
//! through, plus the deadline applied to each store call. The store is
//! `Arc<dyn DocumentStore>`, so the same router runs against `MongoDB` in
//! production and the in-memory store in tests.

use std::sync::Arc;
use std::time::Duration;

use upnext_db::{ArtistStore, DocumentStore, EventStore, ListStore, DEFAULT_REQUEST_TIMEOUT};

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn DocumentStore>,
    request_timeout: Duration,
}

impl AppState {
    /// Create state over a document store with the default request timeout.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Override the deadline applied to each store call.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Artist queries.
    pub fn artists(&self) -> ArtistStore<'_> {
        ArtistStore::new(self.store.as_ref()).with_timeout(self.request_timeout)
    }

    /// Event queries.
    pub fn events(&self) -> EventStore<'_> {
        EventStore::new(self.store.as_ref()).with_timeout(self.request_timeout)
    }

    /// List and list item operations.
    pub fn lists(&self) -> ListStore<'_> {
        ListStore::new(self.store.as_ref()).with_timeout(self.request_timeout)
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}
