//! Store-agnostic query descriptions.
//!
//! The per-resource stores describe what they want as plain BSON documents
//! in `MongoDB` query syntax; each [`DocumentStore`](crate::DocumentStore)
//! backend executes them. Building a query never touches the store, so the
//! builders are tested as pure functions.

use bson::oid::ObjectId;
use bson::Document;

/// A find operation: filter, optional sort, projection and limit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindQuery {
    /// Documents must match this filter.
    pub filter: Document,
    /// Sort specification (`{field: 1 | -1}`), applied in key order.
    pub sort: Option<Document>,
    /// Inclusion projection (`{field: 1}`). `_id` is always returned.
    pub projection: Option<Document>,
    /// Maximum number of documents to return.
    pub limit: Option<i64>,
}

impl FindQuery {
    /// Query matching the given filter, unsorted and unlimited.
    pub const fn new(filter: Document) -> Self {
        Self {
            filter,
            sort: None,
            projection: None,
            limit: None,
        }
    }

    /// Query matching every document in a collection.
    pub fn all() -> Self {
        Self::default()
    }

    /// Set the sort specification.
    #[must_use]
    pub fn sort(mut self, sort: Document) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Set the projection.
    #[must_use]
    pub fn projection(mut self, projection: Document) -> Self {
        self.projection = Some(projection);
        self
    }

    /// Cap the number of returned documents.
    #[must_use]
    pub const fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// An upsert that writes only when no document matches.
///
/// On insert the new document holds the filter's equality fields plus
/// `on_insert`. When a document already matches, nothing is modified.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertOnlyUpsert {
    /// Identifies the single document this upsert targets.
    pub filter: Document,
    /// Fields written only when inserting (`$setOnInsert`).
    pub on_insert: Document,
}

/// What an [`InsertOnlyUpsert`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No document matched; one was inserted with this id.
    Inserted(ObjectId),
    /// A matching document already existed and was left untouched.
    Existing,
}

impl UpsertOutcome {
    /// True when the upsert created a document.
    pub const fn is_inserted(self) -> bool {
        matches!(self, Self::Inserted(_))
    }
}

#[cfg(test)]
mod tests {
    use bson::doc;

    use super::*;

    #[test]
    fn builder_sets_every_part() {
        let query = FindQuery::new(doc! { "name": "x" })
            .sort(doc! { "name": 1 })
            .projection(doc! { "name": 1 })
            .limit(5);
        assert_eq!(query.filter, doc! { "name": "x" });
        assert_eq!(query.sort, Some(doc! { "name": 1 }));
        assert_eq!(query.projection, Some(doc! { "name": 1 }));
        assert_eq!(query.limit, Some(5));
    }

    #[test]
    fn all_matches_everything() {
        let query = FindQuery::all();
        assert!(query.filter.is_empty());
        assert!(query.sort.is_none());
        assert!(query.limit.is_none());
    }
}
