//! Type-safe identifier wrappers around [`ObjectId`].
//!
//! Every record in the catalog carries a store-assigned `ObjectId`. The
//! wrappers keep artist, event, list and list-item identifiers from being
//! mixed up at compile time, and give them a single wire format: the
//! 24-character lowercase hex string.

use std::str::FromStr;

use bson::oid::ObjectId;
use bson::Bson;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An identifier string that is not a valid `ObjectId`.
#[derive(Debug, thiserror::Error)]
#[error("invalid id {input:?}: {source}")]
pub struct IdError {
    /// The raw text that failed to parse.
    pub input: String,
    /// The underlying parse failure.
    pub source: bson::oid::Error,
}

/// Generates a newtype wrapper around [`ObjectId`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub ObjectId);

        impl $name {
            /// Generate a fresh identifier.
            pub fn new() -> Self {
                Self(ObjectId::new())
            }

            /// Return the inner [`ObjectId`] value.
            pub const fn into_inner(self) -> ObjectId {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0.to_hex())
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                ObjectId::parse_str(s).map(Self).map_err(|source| IdError {
                    input: s.to_owned(),
                    source,
                })
            }
        }

        impl From<ObjectId> for $name {
            fn from(id: ObjectId) -> Self {
                Self(id)
            }
        }

        impl From<$name> for ObjectId {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl From<$name> for Bson {
            fn from(id: $name) -> Self {
                Self::ObjectId(id.0)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.0.to_hex())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

define_id! {
    /// Unique identifier for an artist.
    ArtistId
}

define_id! {
    /// Unique identifier for an event (a concert).
    EventId
}

define_id! {
    /// Unique identifier for a user-curated or system list.
    ListId
}

define_id! {
    /// Unique identifier for an entry in a list.
    ListItemId
}
