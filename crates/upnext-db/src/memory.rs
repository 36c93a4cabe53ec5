//! In-process document store.
//!
//! [`InMemoryStore`] keeps every collection as a `Vec<Document>` behind a
//! [`RwLock`] and interprets the subset of the `MongoDB` query language the
//! catalog's query builders emit:
//!
//! - equality on top-level fields (an array field matches when it contains
//!   the value)
//! - the comparison operators `$eq`, `$ne`, `$lt`, `$lte`, `$gt`, `$gte`
//! - multi-key sorts, with missing fields ordered like `null`
//! - inclusion projections, which always keep `_id`
//! - limits
//!
//! Values of different BSON types are ordered the way `MongoDB` orders
//! them, and range operators only match values of the same type.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{Bson, Document};
use tokio::sync::RwLock;

use crate::error::DbError;
use crate::query::{FindQuery, InsertOnlyUpsert, UpsertOutcome};
use crate::store::{Collection, DocumentStore};

/// A document store held entirely in memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    collections: RwLock<HashMap<Collection, Vec<Document>>>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert documents as-is, assigning an `_id` to any that lack one.
    ///
    /// Returns the ids in insertion order.
    pub async fn seed(
        &self,
        collection: Collection,
        documents: impl IntoIterator<Item = Document>,
    ) -> Vec<ObjectId> {
        let mut collections = self.collections.write().await;
        let stored = collections.entry(collection).or_default();
        documents
            .into_iter()
            .map(|document| {
                let (id, document) = with_object_id(document);
                stored.push(document);
                id
            })
            .collect()
    }

    /// Snapshot of every document in a collection, in insertion order.
    pub async fn documents(&self, collection: Collection) -> Vec<Document> {
        self.collections
            .read()
            .await
            .get(&collection)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn find(
        &self,
        collection: Collection,
        query: &FindQuery,
    ) -> Result<Vec<Document>, DbError> {
        let collections = self.collections.read().await;
        let mut matched: Vec<&Document> = collections
            .get(&collection)
            .map(|documents| {
                documents
                    .iter()
                    .filter(|document| matches_filter(document, &query.filter))
                    .collect()
            })
            .unwrap_or_default();

        if let Some(sort) = &query.sort {
            matched.sort_by(|a, b| compare_by_sort(a, b, sort));
        }

        let limit = query
            .limit
            .filter(|limit| *limit > 0)
            .and_then(|limit| usize::try_from(limit).ok())
            .unwrap_or(usize::MAX);

        Ok(matched
            .into_iter()
            .take(limit)
            .map(|document| project(document, query.projection.as_ref()))
            .collect())
    }

    async fn find_one(
        &self,
        collection: Collection,
        query: &FindQuery,
    ) -> Result<Option<Document>, DbError> {
        let first = self.find(collection, &query.clone().limit(1)).await?;
        Ok(first.into_iter().next())
    }

    async fn insert_one(
        &self,
        collection: Collection,
        document: Document,
    ) -> Result<ObjectId, DbError> {
        let (id, document) = with_object_id(document);
        self.collections
            .write()
            .await
            .entry(collection)
            .or_default()
            .push(document);
        Ok(id)
    }

    async fn upsert_on_insert(
        &self,
        collection: Collection,
        upsert: &InsertOnlyUpsert,
    ) -> Result<UpsertOutcome, DbError> {
        // Match and insert under one write lock so identical concurrent
        // upserts cannot both insert.
        let mut collections = self.collections.write().await;
        let stored = collections.entry(collection).or_default();

        if stored
            .iter()
            .any(|document| matches_filter(document, &upsert.filter))
        {
            return Ok(UpsertOutcome::Existing);
        }

        let id = ObjectId::new();
        let mut document = Document::new();
        document.insert("_id", id);
        for (key, value) in &upsert.filter {
            if !is_operator_document(value) {
                document.insert(key.clone(), value.clone());
            }
        }
        for (key, value) in &upsert.on_insert {
            document.insert(key.clone(), value.clone());
        }
        stored.push(document);

        Ok(UpsertOutcome::Inserted(id))
    }
}

/// Ensure the document has an `ObjectId` `_id`, generating one if absent.
/// `_id` is stored as the first key, as `MongoDB` does.
fn with_object_id(document: Document) -> (ObjectId, Document) {
    let id = document
        .get_object_id("_id")
        .unwrap_or_else(|_| ObjectId::new());
    let mut stored = Document::new();
    stored.insert("_id", id);
    for (key, value) in document {
        if key != "_id" {
            stored.insert(key, value);
        }
    }
    (id, stored)
}

/// True when `value` is a sub-document of `$` operators, e.g. `{"$lt": x}`.
fn is_operator_document(value: &Bson) -> bool {
    match value {
        Bson::Document(inner) => {
            !inner.is_empty() && inner.keys().all(|key| key.starts_with('$'))
        }
        _ => false,
    }
}

fn matches_filter(document: &Document, filter: &Document) -> bool {
    filter.iter().all(|(key, condition)| {
        let value = document.get(key);
        match condition {
            Bson::Document(operators) if is_operator_document(condition) => operators
                .iter()
                .all(|(operator, operand)| matches_operator(value, operator, operand)),
            _ => matches_equality(value, condition),
        }
    })
}

/// Equality with `MongoDB` semantics: a missing field equals `null`, and an
/// array field equals any of its elements as well as the whole array.
fn matches_equality(value: Option<&Bson>, expected: &Bson) -> bool {
    match value {
        None => *expected == Bson::Null,
        Some(Bson::Array(items)) => {
            items.contains(expected) || matches!(expected, Bson::Array(e) if e == items)
        }
        Some(value) => value == expected,
    }
}

fn matches_operator(value: Option<&Bson>, operator: &str, operand: &Bson) -> bool {
    match operator {
        "$eq" => matches_equality(value, operand),
        "$ne" => !matches_equality(value, operand),
        "$lt" => matches_range(value, operand, Ordering::is_lt),
        "$lte" => matches_range(value, operand, Ordering::is_le),
        "$gt" => matches_range(value, operand, Ordering::is_gt),
        "$gte" => matches_range(value, operand, Ordering::is_ge),
        _ => false,
    }
}

/// Range comparison: only values of the same BSON type class compare, and
/// array fields match when any element does.
fn matches_range(value: Option<&Bson>, operand: &Bson, accept: fn(Ordering) -> bool) -> bool {
    match value {
        None => false,
        Some(Bson::Array(items)) => items
            .iter()
            .any(|item| matches_range(Some(item), operand, accept)),
        Some(value) => {
            type_rank(value) == type_rank(operand) && accept(compare_values(value, operand))
        }
    }
}

fn compare_by_sort(a: &Document, b: &Document, sort: &Document) -> Ordering {
    for (key, direction) in sort {
        let ordering = compare_values(
            a.get(key).unwrap_or(&Bson::Null),
            b.get(key).unwrap_or(&Bson::Null),
        );
        let ordering = if is_descending(direction) {
            ordering.reverse()
        } else {
            ordering
        };
        if ordering.is_ne() {
            return ordering;
        }
    }
    Ordering::Equal
}

fn is_descending(direction: &Bson) -> bool {
    match direction {
        Bson::Int32(n) => *n < 0,
        Bson::Int64(n) => *n < 0,
        Bson::Double(n) => *n < 0.0,
        _ => false,
    }
}

/// Position of a value's type in `MongoDB`'s cross-type sort order.
const fn type_rank(value: &Bson) -> u8 {
    match value {
        Bson::MinKey => 0,
        Bson::Null | Bson::Undefined => 1,
        Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_) | Bson::Decimal128(_) => 2,
        Bson::String(_) | Bson::Symbol(_) => 3,
        Bson::Document(_) => 4,
        Bson::Array(_) => 5,
        Bson::Binary(_) => 6,
        Bson::ObjectId(_) => 7,
        Bson::Boolean(_) => 8,
        Bson::DateTime(_) => 9,
        Bson::Timestamp(_) => 10,
        Bson::RegularExpression(_) => 11,
        Bson::MaxKey => 13,
        _ => 12,
    }
}

#[allow(clippy::cast_precision_loss)]
fn as_f64(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(n) => Some(f64::from(*n)),
        Bson::Int64(n) => Some(*n as f64),
        Bson::Double(n) => Some(*n),
        _ => None,
    }
}

fn compare_values(a: &Bson, b: &Bson) -> Ordering {
    let by_type = type_rank(a).cmp(&type_rank(b));
    if by_type.is_ne() {
        return by_type;
    }
    match (a, b) {
        (Bson::String(x), Bson::String(y)) => x.cmp(y),
        (Bson::ObjectId(x), Bson::ObjectId(y)) => x.cmp(y),
        (Bson::Boolean(x), Bson::Boolean(y)) => x.cmp(y),
        (Bson::DateTime(x), Bson::DateTime(y)) => {
            x.timestamp_millis().cmp(&y.timestamp_millis())
        }
        (Bson::Int32(x), Bson::Int32(y)) => x.cmp(y),
        (Bson::Int64(x), Bson::Int64(y)) => x.cmp(y),
        _ => match (as_f64(a), as_f64(b)) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            _ => Ordering::Equal,
        },
    }
}

fn project(document: &Document, projection: Option<&Document>) -> Document {
    let Some(projection) = projection else {
        return document.clone();
    };

    let include_id = projection.get("_id").is_none_or(is_truthy);
    let mut projected = Document::new();
    for (key, value) in document {
        let keep = if key == "_id" {
            include_id
        } else {
            projection.get(key).is_some_and(is_truthy)
        };
        if keep {
            projected.insert(key.clone(), value.clone());
        }
    }
    projected
}

fn is_truthy(value: &Bson) -> bool {
    match value {
        Bson::Boolean(b) => *b,
        Bson::Int32(n) => *n != 0,
        Bson::Int64(n) => *n != 0,
        Bson::Double(n) => n.abs() > 0.0,
        Bson::Null => false,
        _ => true,
    }
}
