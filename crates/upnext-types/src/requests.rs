//! Request and response bodies for the write endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::ItemStatus;
use crate::ids::ListId;

/// Body of `POST /lists`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateListRequest {
    /// Name for the new list. Must be non-empty.
    #[serde(default)]
    pub name: String,
}

/// Response of `POST /lists`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedList {
    /// Identifier assigned to the new list.
    pub id: ListId,
    /// The name it was created with.
    pub name: String,
}

/// Body of `POST /lists/{id}/items`.
///
/// `event_id` stays a raw string so the handler can report a bad identifier
/// with the parse error rather than a generic body error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddListItemRequest {
    /// Hex identifier of the event to add.
    #[serde(default)]
    pub event_id: String,
    /// Initial status.
    #[serde(default)]
    pub status: Option<ItemStatus>,
    /// Initial note.
    #[serde(default)]
    pub note: Option<String>,
    /// When the user attended.
    #[serde(default)]
    pub attended_at: Option<DateTime<Utc>>,
}

/// Plain acknowledgement body, `{"ok": true}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    /// Always true on success.
    pub ok: bool,
}

impl Ack {
    /// The success acknowledgement.
    pub const OK: Self = Self { ok: true };
}
