//! Core entity structs for the catalog: artists, events, lists and list
//! items, in the shape the API returns them.
//!
//! Keys are camelCase on the wire. Optional fields are omitted when absent
//! rather than serialized as `null`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::ItemStatus;
use crate::ids::{ArtistId, EventId, ListId, ListItemId};

// ---------------------------------------------------------------------------
// Artist
// ---------------------------------------------------------------------------

/// A performing artist. Read-only through the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    /// Store-assigned identifier.
    pub id: ArtistId,
    /// Display name.
    pub name: String,
    /// Short biography, when one has been collected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synopsis: Option<Synopsis>,
}

/// Biography text attached to an artist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Synopsis {
    /// The biography itself.
    pub text: String,
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// A concert or show. Read-only through the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Store-assigned identifier.
    pub id: EventId,
    /// Event title.
    pub title: String,
    /// When the show starts.
    pub starts_at: DateTime<Utc>,
    /// Name of the tour this show belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tour_name: Option<String>,
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

/// A named collection of events, created by a user or by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    /// Store-assigned identifier.
    pub id: ListId,
    /// Display name.
    pub name: String,
    /// Well-known key, set on system lists only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// True when the service owns this list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_system: Option<bool>,
    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last modification time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// One event placed in a list.
///
/// At most one item exists per `(list_id, event_id)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItem {
    /// Store-assigned identifier.
    pub id: ListItemId,
    /// The owning list.
    pub list_id: ListId,
    /// The referenced event.
    pub event_id: EventId,
    /// Free-form user note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Saved or attended.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ItemStatus>,
    /// When the user attended the event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attended_at: Option<DateTime<Utc>>,
    /// When the item was added to the list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<DateTime<Utc>>,
    /// Manual ordering hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}
