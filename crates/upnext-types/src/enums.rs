//! Enumeration types for the catalog.

use bson::Bson;
use serde::{Deserialize, Serialize};

/// Where an event sits in a user's list.
///
/// Stored and transmitted as the lowercase variant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    /// Bookmarked for later.
    Saved,
    /// The user went to the event.
    Attended,
}

impl ItemStatus {
    /// The stored string form.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Saved => "saved",
            Self::Attended => "attended",
        }
    }
}

impl core::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ItemStatus> for Bson {
    fn from(status: ItemStatus) -> Self {
        Self::String(status.as_str().to_owned())
    }
}

/// Which side of "now" an artist's event listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventWindow {
    /// Events starting at or after now, soonest first.
    #[default]
    Upcoming,
    /// Events that started before now, most recent first.
    Past,
}

impl EventWindow {
    /// Interpret the `past` query parameter.
    ///
    /// Only the exact string `"true"` selects [`EventWindow::Past`]; a
    /// missing parameter or any other value selects upcoming events.
    pub fn from_past_param(past: Option<&str>) -> Self {
        if past == Some("true") {
            Self::Past
        } else {
            Self::Upcoming
        }
    }
}
