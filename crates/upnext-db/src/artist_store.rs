//! Artist queries.
//!
//! Artists are written by the ingestion process. The API reads only the
//! name and synopsis, so every query projects down to those fields.

use std::time::Duration;

use bson::oid::ObjectId;
use bson::{doc, Document};
use serde::Deserialize;
use upnext_types::{Artist, ArtistId, Synopsis};

use crate::error::DbError;
use crate::query::FindQuery;
use crate::store::{decode, with_deadline, Collection, DocumentStore, DEFAULT_REQUEST_TIMEOUT};

/// Maximum number of artists returned by the list endpoint.
pub const ARTIST_LIST_LIMIT: i64 = 100;

/// A row from the `artists` collection, as far as this service reads it.
#[derive(Debug, Clone, Deserialize)]
pub struct ArtistRow {
    /// Document id.
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Stored biography; may be `null`.
    #[serde(default)]
    pub synopsis: Option<SynopsisRow>,
}

/// The `synopsis` sub-document. Source and licensing fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct SynopsisRow {
    /// Biography text.
    #[serde(default)]
    pub text: String,
}

impl From<ArtistRow> for Artist {
    fn from(row: ArtistRow) -> Self {
        Self {
            id: ArtistId::from(row.id),
            name: row.name,
            synopsis: row.synopsis.map(|s| Synopsis { text: s.text }),
        }
    }
}

fn artist_projection() -> Document {
    doc! { "name": 1, "synopsis": 1 }
}

/// Every artist, by name, capped at [`ARTIST_LIST_LIMIT`].
pub fn list_query() -> FindQuery {
    FindQuery::all()
        .sort(doc! { "name": 1 })
        .projection(artist_projection())
        .limit(ARTIST_LIST_LIMIT)
}

/// A single artist by id.
pub fn detail_query(id: ArtistId) -> FindQuery {
    FindQuery::new(doc! { "_id": id }).projection(artist_projection())
}

/// Operations on the `artists` collection.
pub struct ArtistStore<'a> {
    store: &'a dyn DocumentStore,
    timeout: Duration,
}

impl<'a> ArtistStore<'a> {
    /// Create an artist store bound to a document store.
    pub const fn new(store: &'a dyn DocumentStore) -> Self {
        Self {
            store,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Set the deadline applied to each store call.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// List artists sorted by name.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails, times out, or a document does
    /// not decode.
    pub async fn list(&self) -> Result<Vec<Artist>, DbError> {
        let documents =
            with_deadline(self.timeout, self.store.find(Collection::Artists, &list_query()))
                .await?;
        documents.into_iter().map(decode::<ArtistRow, _>).collect()
    }

    /// Look up one artist. `Ok(None)` when no artist has this id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails, times out, or the document
    /// does not decode.
    pub async fn get(&self, id: ArtistId) -> Result<Option<Artist>, DbError> {
        with_deadline(
            self.timeout,
            self.store.find_one(Collection::Artists, &detail_query(id)),
        )
        .await?
        .map(decode::<ArtistRow, _>)
        .transpose()
    }
}
