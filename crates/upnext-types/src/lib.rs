//! Shared type definitions for the UpNext catalog API.
//!
//! This crate is the single source of truth for the JSON shapes the API
//! exchanges with clients. The data layer converts stored documents into
//! these types; the HTTP layer serializes them.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe `ObjectId` wrappers for all record identifiers
//! - [`enums`] -- List item status and the artist event window
//! - [`structs`] -- Artists, events, lists and list items
//! - [`requests`] -- Bodies of the write endpoints

pub mod enums;
pub mod ids;
pub mod requests;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{EventWindow, ItemStatus};
pub use ids::{ArtistId, EventId, IdError, ListId, ListItemId};
pub use requests::{Ack, AddListItemRequest, CreateListRequest, CreatedList};
pub use structs::{Artist, Event, List, ListItem, Synopsis};
