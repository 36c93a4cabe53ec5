//! Event queries.

use std::time::Duration;

use bson::oid::ObjectId;
use bson::{doc, Document};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use upnext_types::{ArtistId, Event, EventId, EventWindow};

use crate::error::DbError;
use crate::query::FindQuery;
use crate::store::{decode, with_deadline, Collection, DocumentStore, DEFAULT_REQUEST_TIMEOUT};

/// Maximum number of events returned by `GET /events`.
pub const EVENT_LIST_LIMIT: i64 = 100;

/// Maximum number of events returned for one artist.
pub const ARTIST_EVENTS_LIMIT: i64 = 200;

/// A row from the `events` collection.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRow {
    /// Document id.
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// Event title.
    #[serde(default)]
    pub title: String,
    /// Start time, stored as a BSON date.
    pub starts_at: bson::DateTime,
    /// Tour name; may be missing or `null`.
    #[serde(default)]
    pub tour_name: Option<String>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Self {
            id: EventId::from(row.id),
            title: row.title,
            starts_at: row.starts_at.to_chrono(),
            tour_name: row.tour_name,
        }
    }
}

fn event_projection() -> Document {
    doc! { "title": 1, "startsAt": 1, "tourName": 1 }
}

/// The next [`EVENT_LIST_LIMIT`] events by start time.
pub fn list_query() -> FindQuery {
    FindQuery::all()
        .sort(doc! { "startsAt": 1 })
        .projection(event_projection())
        .limit(EVENT_LIST_LIMIT)
}

/// A single event by id.
pub fn detail_query(id: EventId) -> FindQuery {
    FindQuery::new(doc! { "_id": id }).projection(event_projection())
}

/// Events featuring `artist` on one side of `now`.
///
/// Upcoming events start at or after `now` and come soonest first. Past
/// events started strictly before `now` and come most recent first.
pub fn artist_events_query(artist: ArtistId, window: EventWindow, now: DateTime<Utc>) -> FindQuery {
    let now = bson::DateTime::from_chrono(now);
    let (range, direction) = match window {
        EventWindow::Upcoming => (doc! { "$gte": now }, 1),
        EventWindow::Past => (doc! { "$lt": now }, -1),
    };

    FindQuery::new(doc! { "artists": artist, "startsAt": range })
        .sort(doc! { "startsAt": direction })
        .projection(event_projection())
        .limit(ARTIST_EVENTS_LIMIT)
}

/// Operations on the `events` collection.
pub struct EventStore<'a> {
    store: &'a dyn DocumentStore,
    timeout: Duration,
}

impl<'a> EventStore<'a> {
    /// Create an event store bound to a document store.
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

    /// List events by ascending start time.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails, times out, or a document does
    /// not decode.
    pub async fn list(&self) -> Result<Vec<Event>, DbError> {
        self.run(&list_query()).await
    }

    /// Look up one event. `Ok(None)` when no event has this id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails, times out, or the document
    /// does not decode.
    pub async fn get(&self, id: EventId) -> Result<Option<Event>, DbError> {
        with_deadline(
            self.timeout,
            self.store.find_one(Collection::Events, &detail_query(id)),
        )
        .await?
        .map(decode::<EventRow, _>)
        .transpose()
    }

    /// Events featuring an artist, in the requested window relative to `now`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails, times out, or a document does
    /// not decode.
    pub async fn for_artist(
        &self,
        artist: ArtistId,
        window: EventWindow,
        now: DateTime<Utc>,
    ) -> Result<Vec<Event>, DbError> {
        self.run(&artist_events_query(artist, window, now)).await
    }

    async fn run(&self, query: &FindQuery) -> Result<Vec<Event>, DbError> {
        let documents =
            with_deadline(self.timeout, self.store.find(Collection::Events, query)).await?;
        documents.into_iter().map(decode::<EventRow, _>).collect()
    }
}
