use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;

use polaris_core::DocumentId;

use super::{
    Direction, Document, DocumentStore, Filter, FindOptions, ID_FIELD, StoreError, StoreResult, UNIQUE_KEYS,
    compare, document_id, id_value,
};

type Collection = BTreeMap<DocumentId, Document>;

/// In-memory document store.
///
/// Intended for tests and the `memory` backend. Collections are ordered by id,
/// which for UUIDv7 ids is insertion order.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> StoreError {
        StoreError::Backend("lock poisoned".to_string())
    }

    /// Unique-key check against every other document of the collection.
    fn ensure_unique(collection: &str, docs: &Collection, id: &DocumentId, candidate: &Document) -> StoreResult<()> {
        for (coll, field) in UNIQUE_KEYS {
            if *coll != collection {
                continue;
            }
            let Some(value) = candidate.get(*field) else {
                continue;
            };
            let taken = docs
                .iter()
                .any(|(other, doc)| other != id && doc.get(*field) == Some(value));
            if taken {
                return Err(StoreError::Duplicate(format!("{collection}.{field}")));
            }
        }
        Ok(())
    }
}

fn sort_docs(docs: &mut [Document], field: &str, direction: Direction) {
    docs.sort_by(|a, b| {
        let ord = match (a.get(field), b.get(field)) {
            (Some(x), Some(y)) => compare(x, y).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => Ordering::Equal,
        };
        let ord = ord.then_with(|| match (a.get(ID_FIELD), b.get(ID_FIELD)) {
            (Some(x), Some(y)) => compare(x, y).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        });
        match direction {
            Direction::Asc => ord,
            Direction::Desc => ord.reverse(),
        }
    });
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, collection: &str, id: &DocumentId) -> StoreResult<Document> {
        let map = self.collections.read().map_err(|_| Self::poisoned())?;
        map.get(collection)
            .and_then(|c| c.get(id))
            .cloned()
            .ok_or_else(|| StoreError::NotFound { collection: collection.to_string(), id: *id })
    }

    async fn find(&self, collection: &str, filter: &Filter, options: FindOptions) -> StoreResult<Vec<Document>> {
        let map = self.collections.read().map_err(|_| Self::poisoned())?;
        let mut docs: Vec<Document> = map
            .get(collection)
            .map(|c| c.values().filter(|d| filter.matches(d)).cloned().collect())
            .unwrap_or_default();
        drop(map);

        if let Some(sort) = &options.sort {
            sort_docs(&mut docs, &sort.field, sort.direction);
        }
        let skip = options.skip.unwrap_or(0) as usize;
        let limit = options.limit.map(|l| l as usize).unwrap_or(usize::MAX);
        Ok(docs.into_iter().skip(skip).take(limit).collect())
    }

    async fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        let map = self.collections.read().map_err(|_| Self::poisoned())?;
        Ok(map
            .get(collection)
            .map(|c| c.values().filter(|d| filter.matches(d)).count() as u64)
            .unwrap_or(0))
    }

    async fn insert(&self, collection: &str, mut doc: Document) -> StoreResult<DocumentId> {
        let id = match doc.get(ID_FIELD) {
            None => DocumentId::new(),
            Some(_) => document_id(&doc)
                .ok_or_else(|| StoreError::Serialization(format!("{collection}: malformed _id")))?,
        };
        doc.insert(ID_FIELD.to_string(), id_value(&id));

        let mut map = self.collections.write().map_err(|_| Self::poisoned())?;
        let docs = map.entry(collection.to_string()).or_default();
        if docs.contains_key(&id) {
            return Err(StoreError::Duplicate(format!("{collection}._id")));
        }
        Self::ensure_unique(collection, docs, &id, &doc)?;
        docs.insert(id, doc);
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &DocumentId, patch: Document) -> StoreResult<u64> {
        let mut map = self.collections.write().map_err(|_| Self::poisoned())?;
        let Some(docs) = map.get_mut(collection) else {
            return Ok(0);
        };
        let Some(current) = docs.get(id) else {
            return Ok(0);
        };

        let mut next = current.clone();
        for (field, value) in patch {
            if field == ID_FIELD {
                continue;
            }
            next.insert(field, value);
        }
        Self::ensure_unique(collection, docs, id, &next)?;
        docs.insert(*id, next);
        Ok(1)
    }

    async fn delete(&self, collection: &str, id: &DocumentId) -> StoreResult<u64> {
        let mut map = self.collections.write().map_err(|_| Self::poisoned())?;
        let removed = map.get_mut(collection).and_then(|c| c.remove(id));
        Ok(u64::from(removed.is_some()))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::store::Sort;

    fn doc(v: Value) -> Document {
        match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[tokio::test]
    async fn insert_assigns_an_id() {
        let store = InMemoryDocumentStore::new();
        let id = store.insert("customer", doc(json!({"name": "Acme"}))).await.unwrap();
        let got = store.get("customer", &id).await.unwrap();
        assert_eq!(got["_id"], json!(id.to_string()));
        assert_eq!(got["name"], "Acme");
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let store = InMemoryDocumentStore::new();
        let err = store.get("customer", &DocumentId::new()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn update_patches_top_level_fields() {
        let store = InMemoryDocumentStore::new();
        let id = store.insert("salesorder", doc(json!({"status": "notapproved", "total_amount": 5}))).await.unwrap();
        let matched = store.update("salesorder", &id, doc(json!({"status": "approved"}))).await.unwrap();
        assert_eq!(matched, 1);
        let got = store.get("salesorder", &id).await.unwrap();
        assert_eq!(got["status"], "approved");
        assert_eq!(got["total_amount"], 5);

        assert_eq!(store.update("salesorder", &DocumentId::new(), Document::new()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn find_sorts_and_windows() {
        let store = InMemoryDocumentStore::new();
        for n in 1..=5 {
            store
                .insert("supplier", doc(json!({"n": n, "created_at": format!("2024-01-0{n}T00:00:00.000Z")})))
                .await
                .unwrap();
        }
        let page = store
            .find("supplier", &Filter::new(), FindOptions::sorted(Sort::newest_first()).window(1, 2))
            .await
            .unwrap();
        let ns: Vec<_> = page.iter().map(|d| d["n"].as_i64().unwrap()).collect();
        assert_eq!(ns, vec![4, 3]);

        let beyond = store
            .find("supplier", &Filter::new(), FindOptions::default().window(10, 10))
            .await
            .unwrap();
        assert!(beyond.is_empty());
        assert_eq!(store.count("supplier", &Filter::new()).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn unique_keys_are_enforced() {
        let store = InMemoryDocumentStore::new();
        store.insert("polaris_inventory", doc(json!({"sku": "AC-1"}))).await.unwrap();
        let err = store.insert("polaris_inventory", doc(json!({"sku": "AC-1"}))).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));

        let other = store.insert("polaris_inventory", doc(json!({"sku": "AC-2"}))).await.unwrap();
        let err = store
            .update("polaris_inventory", &other, doc(json!({"sku": "AC-1"})))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
    }

    #[tokio::test]
    async fn delete_reports_count() {
        let store = InMemoryDocumentStore::new();
        let id = store.insert("project", doc(json!({"name": "Tower A"}))).await.unwrap();
        assert_eq!(store.delete("project", &id).await.unwrap(), 1);
        assert_eq!(store.delete("project", &id).await.unwrap(), 0);
    }
}
