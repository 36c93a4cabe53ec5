//! The document store abstraction.
//!
//! [`DocumentStore`] is the seam between the catalog logic and the backend
//! that holds the documents. [`MongoStore`](crate::MongoStore) talks to a
//! real `MongoDB` deployment; [`InMemoryStore`](crate::InMemoryStore) keeps
//! documents in process for tests and local development. Both are used
//! through `Arc<dyn DocumentStore>`, so the trait stays object safe via
//! [`async_trait`].

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::Document;
use serde::de::DeserializeOwned;

use crate::error::DbError;
use crate::query::{FindQuery, InsertOnlyUpsert, UpsertOutcome};

/// Default deadline for a single store operation made on behalf of a request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// The collections this service reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// `artists`
    Artists,
    /// `events`
    Events,
    /// `lists`
    Lists,
    /// `list_items`
    ListItems,
}

impl Collection {
    /// The collection name in the database.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Artists => "artists",
            Self::Events => "events",
            Self::Lists => "lists",
            Self::ListItems => "list_items",
        }
    }
}

impl core::fmt::Display for Collection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// A backend able to execute the catalog's document operations.
///
/// Implementations must be safe to share across concurrent requests.
#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    /// Return every document matching `query`, sorted, projected and
    /// limited as it specifies.
    async fn find(&self, collection: Collection, query: &FindQuery)
        -> Result<Vec<Document>, DbError>;

    /// Return the first document matching `query`, or `None`.
    async fn find_one(
        &self,
        collection: Collection,
        query: &FindQuery,
    ) -> Result<Option<Document>, DbError>;

    /// Insert a document and return its `_id`.
    ///
    /// A fresh `ObjectId` is assigned when the document has none.
    async fn insert_one(
        &self,
        collection: Collection,
        document: Document,
    ) -> Result<ObjectId, DbError>;

    /// Insert a document unless one already matches the upsert's filter.
    ///
    /// Must be atomic: concurrent identical upserts leave exactly one
    /// document behind.
    async fn upsert_on_insert(
        &self,
        collection: Collection,
        upsert: &InsertOnlyUpsert,
    ) -> Result<UpsertOutcome, DbError>;
}

/// Run a store operation, failing with [`DbError::Timeout`] once `deadline`
/// has elapsed.
pub async fn with_deadline<T, F>(deadline: Duration, operation: F) -> Result<T, DbError>
where
    F: Future<Output = Result<T, DbError>>,
{
    tokio::time::timeout(deadline, operation)
        .await
        .unwrap_or(Err(DbError::Timeout(deadline)))
}

/// Decode a stored document through its row type into the API type.
pub(crate) fn decode<R, T>(document: Document) -> Result<T, DbError>
where
    R: DeserializeOwned,
    T: From<R>,
{
    let row: R = bson::from_document(document)?;
    Ok(T::from(row))
}
