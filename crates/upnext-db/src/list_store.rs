//! List and list item persistence.
//!
//! Lists are written through the API; the service also owns one system
//! list, keyed `attended`, which [`ListStore::ensure_system_lists`] creates
//! on startup.
//!
//! Adding an item is an insert-only upsert keyed on `(listId, eventId)`.
//! The first submission for a pair decides its note, status and attended
//! time; later submissions for the same pair succeed without changing it.

use std::time::Duration;

use bson::oid::ObjectId;
use bson::{doc, Document};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use upnext_types::{EventId, ItemStatus, List, ListId, ListItem, ListItemId};

use crate::error::DbError;
use crate::query::{FindQuery, InsertOnlyUpsert, UpsertOutcome};
use crate::store::{decode, with_deadline, Collection, DocumentStore, DEFAULT_REQUEST_TIMEOUT};

/// Key of the system list holding attended events.
pub const ATTENDED_LIST_KEY: &str = "attended";

/// Display name of the attended system list.
pub const ATTENDED_LIST_NAME: &str = "Attended";

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// A row from the `lists` collection.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRow {
    /// Document id.
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Well-known key for system lists.
    #[serde(default)]
    pub key: Option<String>,
    /// System ownership flag.
    #[serde(default)]
    pub is_system: Option<bool>,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<bson::DateTime>,
    /// Last modification time.
    #[serde(default)]
    pub updated_at: Option<bson::DateTime>,
}

impl From<ListRow> for List {
    fn from(row: ListRow) -> Self {
        Self {
            id: ListId::from(row.id),
            name: row.name,
            key: row.key,
            is_system: row.is_system,
            created_at: row.created_at.map(bson::DateTime::to_chrono),
            updated_at: row.updated_at.map(bson::DateTime::to_chrono),
        }
    }
}

/// A row from the `list_items` collection.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItemRow {
    /// Document id.
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// Owning list.
    pub list_id: ObjectId,
    /// Referenced event.
    pub event_id: ObjectId,
    /// User note.
    #[serde(default)]
    pub note: Option<String>,
    /// Item status.
    #[serde(default)]
    pub status: Option<ItemStatus>,
    /// Attendance time.
    #[serde(default)]
    pub attended_at: Option<bson::DateTime>,
    /// Time the item was added.
    #[serde(default)]
    pub added_at: Option<bson::DateTime>,
    /// Manual ordering hint.
    #[serde(default)]
    pub order: Option<i64>,
}

impl From<ListItemRow> for ListItem {
    fn from(row: ListItemRow) -> Self {
        Self {
            id: ListItemId::from(row.id),
            list_id: ListId::from(row.list_id),
            event_id: EventId::from(row.event_id),
            note: row.note,
            status: row.status,
            attended_at: row.attended_at.map(bson::DateTime::to_chrono),
            added_at: row.added_at.map(bson::DateTime::to_chrono),
            order: row.order,
        }
    }
}

/// Fields of a list item supplied by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewListItem {
    /// The event to add.
    pub event_id: EventId,
    /// Initial status.
    pub status: Option<ItemStatus>,
    /// Initial note.
    pub note: Option<String>,
    /// When the user attended.
    pub attended_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Query builders
// ---------------------------------------------------------------------------

/// Every list, system lists first, then by name.
pub fn all_query() -> FindQuery {
    FindQuery::all().sort(doc! { "isSystem": -1, "name": 1 })
}

/// A single list by id.
pub fn detail_query(id: ListId) -> FindQuery {
    FindQuery::new(doc! { "_id": id })
}

/// The document stored for a new user list.
pub fn new_list_document(name: &str, now: DateTime<Utc>) -> Document {
    let now = bson::DateTime::from_chrono(now);
    doc! { "name": name, "createdAt": now, "updatedAt": now }
}

/// Items of a list, most recently added first.
pub fn items_query(list: ListId) -> FindQuery {
    FindQuery::new(doc! { "listId": list }).sort(doc! { "addedAt": -1 })
}

/// Insert-only upsert for one `(list, event)` pair.
///
/// Absent optional fields are left out of the stored document.
pub fn add_item_upsert(list: ListId, item: &NewListItem, now: DateTime<Utc>) -> InsertOnlyUpsert {
    let mut on_insert = doc! { "addedAt": bson::DateTime::from_chrono(now) };
    if let Some(note) = &item.note {
        on_insert.insert("note", note.as_str());
    }
    if let Some(status) = item.status {
        on_insert.insert("status", status);
    }
    if let Some(attended_at) = item.attended_at {
        on_insert.insert("attendedAt", bson::DateTime::from_chrono(attended_at));
    }

    InsertOnlyUpsert {
        filter: doc! { "listId": list, "eventId": item.event_id },
        on_insert,
    }
}

/// Insert-only upsert creating the attended system list.
pub fn attended_list_upsert(now: DateTime<Utc>) -> InsertOnlyUpsert {
    let now = bson::DateTime::from_chrono(now);
    InsertOnlyUpsert {
        filter: doc! { "key": ATTENDED_LIST_KEY },
        on_insert: doc! {
            "name": ATTENDED_LIST_NAME,
            "key": ATTENDED_LIST_KEY,
            "isSystem": true,
            "createdAt": now,
            "updatedAt": now,
        },
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Operations on the `lists` and `list_items` collections.
pub struct ListStore<'a> {
    store: &'a dyn DocumentStore,
    timeout: Duration,
}

impl<'a> ListStore<'a> {
    /// Create a list store bound to a document store.
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

    /// All lists, system lists first.
    pub async fn all(&self) -> Result<Vec<List>, DbError> {
        let documents =
            with_deadline(self.timeout, self.store.find(Collection::Lists, &all_query())).await?;
        documents.into_iter().map(decode::<ListRow, _>).collect()
    }

    /// Look up one list. `Ok(None)` when no list has this id.
    pub async fn get(&self, id: ListId) -> Result<Option<List>, DbError> {
        with_deadline(
            self.timeout,
            self.store.find_one(Collection::Lists, &detail_query(id)),
        )
        .await?
        .map(decode::<ListRow, _>)
        .transpose()
    }

    /// Create a user list and return its id.
    ///
    /// The caller validates the name.
    pub async fn create(&self, name: &str, now: DateTime<Utc>) -> Result<ListId, DbError> {
        let id = with_deadline(
            self.timeout,
            self.store
                .insert_one(Collection::Lists, new_list_document(name, now)),
        )
        .await?;
        Ok(ListId::from(id))
    }

    /// Items of one list, newest first. A list with no items, or no such
    /// list, yields an empty vector.
    pub async fn items(&self, list: ListId) -> Result<Vec<ListItem>, DbError> {
        let documents = with_deadline(
            self.timeout,
            self.store.find(Collection::ListItems, &items_query(list)),
        )
        .await?;
        documents.into_iter().map(decode::<ListItemRow, _>).collect()
    }

    /// Add an event to a list unless it is already there.
    ///
    /// The list itself is not looked up.
    pub async fn add_item(
        &self,
        list: ListId,
        item: &NewListItem,
        now: DateTime<Utc>,
    ) -> Result<UpsertOutcome, DbError> {
        let upsert = add_item_upsert(list, item, now);
        let outcome = with_deadline(
            self.timeout,
            self.store.upsert_on_insert(Collection::ListItems, &upsert),
        )
        .await?;

        if !outcome.is_inserted() {
            tracing::debug!(%list, event = %item.event_id, "List item already present; left unchanged");
        }
        Ok(outcome)
    }

    /// Make sure the attended system list exists.
    pub async fn ensure_system_lists(&self, now: DateTime<Utc>) -> Result<UpsertOutcome, DbError> {
        with_deadline(
            self.timeout,
            self.store
                .upsert_on_insert(Collection::Lists, &attended_list_upsert(now)),
        )
        .await
    }
}
