//! Entity Store Adapter.
//!
//! Every read and write in the system goes through [`DocumentStore`]. Documents
//! are JSON objects keyed by a string `_id`; the two backends are an in-memory
//! map (tests, `memory` backend) and MongoDB.

pub mod memory;
pub mod mongo;

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use thiserror::Error;

use polaris_core::{DocumentId, DomainError, collections};

pub use memory::InMemoryDocumentStore;
pub use mongo::MongoDocumentStore;

pub type Document = Map<String, Value>;

pub const ID_FIELD: &str = "_id";

/// `(collection, field)` pairs with a uniqueness guarantee in every backend.
pub const UNIQUE_KEYS: &[(&str, &str)] = &[
    (collections::INVENTORY, "sku"),
    (collections::USER, "email"),
    (collections::ROLE, "name"),
];

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{collection} {id} not found")]
    NotFound { collection: String, id: DocumentId },

    #[error("duplicate value for unique key {0}")]
    Duplicate(String),

    #[error("document (de)serialization failed: {0}")]
    Serialization(String),

    #[error("storage backend failure: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { collection, id } => {
                DomainError::not_found(format!("{collection} {id} not found"))
            }
            StoreError::Duplicate(key) => DomainError::conflict(format!("{key} already exists")),
            StoreError::Serialization(msg) | StoreError::Backend(msg) => DomainError::internal(msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq(Value),
    In(Vec<Value>),
    Gte(Value),
    Lte(Value),
}

/// A conjunction of per-field conditions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, Condition)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((field.into(), Condition::Eq(value.into())));
        self
    }

    pub fn is_in<V: Into<Value>>(mut self, field: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        let values = values.into_iter().map(Into::into).collect();
        self.conditions.push((field.into(), Condition::In(values)));
        self
    }

    pub fn gte(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((field.into(), Condition::Gte(value.into())));
        self
    }

    pub fn lte(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((field.into(), Condition::Lte(value.into())));
        self
    }

    /// Inclusive on both ends.
    pub fn between(self, field: impl Into<String>, lo: impl Into<Value>, hi: impl Into<Value>) -> Self {
        let field = field.into();
        self.gte(field.clone(), lo).lte(field, hi)
    }

    pub fn conditions(&self) -> &[(String, Condition)] {
        &self.conditions
    }

    pub fn matches(&self, doc: &Document) -> bool {
        self.conditions.iter().all(|(field, cond)| {
            let Some(actual) = doc.get(field) else {
                return false;
            };
            match cond {
                Condition::Eq(v) => actual == v,
                Condition::In(vs) => vs.contains(actual),
                Condition::Gte(v) => matches!(compare(actual, v), Some(Ordering::Greater | Ordering::Equal)),
                Condition::Lte(v) => matches!(compare(actual, v), Some(Ordering::Less | Ordering::Equal)),
            }
        })
    }
}

/// Orders numbers numerically and strings lexicographically; anything else is
/// incomparable.
pub fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => Some(x.cmp(&y)),
            _ => x.as_f64()?.partial_cmp(&y.as_f64()?),
        },
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub direction: Direction,
}

impl Sort {
    pub fn asc(field: impl Into<String>) -> Self {
        Self { field: field.into(), direction: Direction::Asc }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self { field: field.into(), direction: Direction::Desc }
    }

    pub fn newest_first() -> Self {
        Self::desc("created_at")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindOptions {
    pub sort: Option<Sort>,
    pub skip: Option<u64>,
    pub limit: Option<u64>,
}

impl FindOptions {
    pub fn sorted(sort: Sort) -> Self {
        Self { sort: Some(sort), ..Self::default() }
    }

    pub fn window(mut self, skip: u64, limit: u64) -> Self {
        self.skip = Some(skip);
        self.limit = Some(limit);
        self
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: &str, id: &DocumentId) -> StoreResult<Document>;

    async fn find(&self, collection: &str, filter: &Filter, options: FindOptions) -> StoreResult<Vec<Document>>;

    async fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64>;

    /// Inserts `doc`, generating an `_id` when it has none.
    async fn insert(&self, collection: &str, doc: Document) -> StoreResult<DocumentId>;

    /// Sets each top-level field of `patch`; returns the matched count.
    async fn update(&self, collection: &str, id: &DocumentId, patch: Document) -> StoreResult<u64>;

    async fn delete(&self, collection: &str, id: &DocumentId) -> StoreResult<u64>;
}

#[async_trait]
impl<S> DocumentStore for Arc<S>
where
    S: DocumentStore + ?Sized,
{
    async fn get(&self, collection: &str, id: &DocumentId) -> StoreResult<Document> {
        (**self).get(collection, id).await
    }

    async fn find(&self, collection: &str, filter: &Filter, options: FindOptions) -> StoreResult<Vec<Document>> {
        (**self).find(collection, filter, options).await
    }

    async fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        (**self).count(collection, filter).await
    }

    async fn insert(&self, collection: &str, doc: Document) -> StoreResult<DocumentId> {
        (**self).insert(collection, doc).await
    }

    async fn update(&self, collection: &str, id: &DocumentId, patch: Document) -> StoreResult<u64> {
        (**self).update(collection, id, patch).await
    }

    async fn delete(&self, collection: &str, id: &DocumentId) -> StoreResult<u64> {
        (**self).delete(collection, id).await
    }
}

pub fn to_document<T: Serialize>(value: &T) -> StoreResult<Document> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(StoreError::Serialization(format!("expected an object, got {other}"))),
        Err(e) => Err(StoreError::Serialization(e.to_string())),
    }
}

pub fn from_document<T: DeserializeOwned>(doc: Document) -> StoreResult<T> {
    serde_json::from_value(Value::Object(doc)).map_err(|e| StoreError::Serialization(e.to_string()))
}

/// The document's `_id`, if present and well formed.
pub fn document_id(doc: &Document) -> Option<DocumentId> {
    doc.get(ID_FIELD)?.as_str()?.parse().ok()
}

pub fn id_value(id: &DocumentId) -> Value {
    Value::String(id.to_string())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn doc(v: Value) -> Document {
        match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn filter_conjunction() {
        let d = doc(json!({"status": "approved", "total_amount": 250, "created_at": "2024-06-03T10:00:00.000Z"}));
        assert!(Filter::new().eq("status", "approved").matches(&d));
        assert!(!Filter::new().eq("status", "approved").eq("total_amount", 1).matches(&d));
        assert!(Filter::new().is_in("status", ["notapproved", "approved"]).matches(&d));
        assert!(
            Filter::new()
                .between("created_at", "2024-06-01T00:00:00.000Z", "2024-06-03T23:59:59.999Z")
                .matches(&d)
        );
        assert!(!Filter::new().gte("total_amount", 251).matches(&d));
    }

    #[test]
    fn missing_field_never_matches() {
        let d = doc(json!({"a": 1}));
        assert!(!Filter::new().eq("b", 1).matches(&d));
        assert!(Filter::new().matches(&d));
    }

    #[test]
    fn store_errors_map_to_domain_errors() {
        let id = DocumentId::new();
        let e: DomainError = StoreError::NotFound { collection: "customer".into(), id }.into();
        assert!(matches!(e, DomainError::NotFound(_)));
        let e: DomainError = StoreError::Duplicate("sku".into()).into();
        assert!(matches!(e, DomainError::Conflict(_)));
        let e: DomainError = StoreError::Backend("socket closed".into()).into();
        assert_eq!(e.code(), "internal");
    }

    proptest::proptest! {
        #[test]
        fn between_is_inclusive_range(x in -1000i64..1000, lo in -1000i64..1000, span in 0i64..500) {
            let hi = lo + span;
            let d = doc(json!({ "amount": x }));
            let matched = Filter::new().between("amount", lo, hi).matches(&d);
            proptest::prop_assert_eq!(matched, lo <= x && x <= hi);
        }
    }
}
