//! Cross-entity projection engine.
//!
//! List and detail views need display fields stored on other documents (a
//! sales-order row shows the project and customer names). A page of root
//! documents is fetched first, every foreign id is collected into a
//! [`RefSet`], and [`Resolver`] issues one `In` query per referenced
//! collection. Unresolvable references degrade to empty strings.

pub mod views;

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;
use serde_json::Value;

use polaris_core::{DocumentId, DomainResult, Entity, Page, PageRequest};

use crate::repository::Repository;
use crate::store::{Document, DocumentStore, Filter, FindOptions, ID_FIELD, document_id, id_value};

/// Foreign ids to resolve, grouped by collection.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RefSet {
    wanted: BTreeMap<&'static str, BTreeSet<DocumentId>>,
}

impl RefSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, collection: &'static str, id: DocumentId) {
        self.wanted.entry(collection).or_default().insert(id);
    }

    pub fn add_opt(&mut self, collection: &'static str, id: Option<DocumentId>) {
        if let Some(id) = id {
            self.add(collection, id);
        }
    }

    pub fn collections(&self) -> usize {
        self.wanted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wanted.is_empty()
    }
}

/// Documents found for a [`RefSet`].
#[derive(Debug, Default, Clone)]
pub struct ResolvedRefs {
    docs: HashMap<(&'static str, DocumentId), Document>,
}

impl ResolvedRefs {
    pub fn get(&self, collection: &'static str, id: &DocumentId) -> Option<&Document> {
        self.docs.get(&(collection, *id))
    }

    /// String field of a referenced document, or `""`.
    pub fn text(&self, collection: &'static str, id: &DocumentId, field: &str) -> String {
        self.get(collection, id)
            .and_then(|d| d.get(field))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }

    pub fn text_opt(&self, collection: &'static str, id: Option<&DocumentId>, field: &str) -> String {
        id.map(|id| self.text(collection, id, field)).unwrap_or_default()
    }

    /// Integer field of a referenced document, or `0`.
    pub fn number(&self, collection: &'static str, id: &DocumentId, field: &str) -> i64 {
        self.get(collection, id)
            .and_then(|d| d.get(field))
            .and_then(Value::as_i64)
            .unwrap_or(0)
    }
}

pub struct Resolver<'a, S> {
    store: &'a S,
}

impl<'a, S: DocumentStore> Resolver<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// One lookup per collection in `refs`. A failed lookup is logged and
    /// leaves that collection unresolved; it never fails the caller.
    pub async fn resolve(&self, refs: &RefSet) -> ResolvedRefs {
        let mut resolved = ResolvedRefs::default();
        for (collection, ids) in &refs.wanted {
            let filter = Filter::new().is_in(ID_FIELD, ids.iter().map(id_value));
            match self.store.find(collection, &filter, FindOptions::default()).await {
                Ok(docs) => {
                    let found = docs.len();
                    for doc in docs {
                        if let Some(id) = document_id(&doc) {
                            resolved.docs.insert((collection, id), doc);
                        }
                    }
                    if found < ids.len() {
                        tracing::warn!(
                            collection = %collection,
                            missing = ids.len() - found,
                            "unresolved references rendered empty"
                        );
                    }
                }
                Err(e) => {
                    tracing::warn!(collection = %collection, error = %e, "reference lookup failed");
                }
            }
        }
        resolved
    }
}

/// A stored entity with a denormalised read shape.
pub trait Projection: Entity + Sized {
    type Row: Serialize + Send;

    fn references(&self, refs: &mut RefSet);

    fn project(self, refs: &ResolvedRefs) -> Self::Row;
}

/// Resolve and project an already loaded batch.
pub async fn project_all<S, T>(store: &S, items: Vec<T>) -> Vec<T::Row>
where
    S: DocumentStore,
    T: Projection,
{
    let mut refs = RefSet::new();
    for item in &items {
        item.references(&mut refs);
    }
    let resolved = Resolver::new(store).resolve(&refs).await;
    items.into_iter().map(|i| i.project(&resolved)).collect()
}

/// Newest-first page of `T` matching `filter`, projected.
pub async fn project_page<S, T>(store: &S, filter: &Filter, request: PageRequest) -> DomainResult<Page<T::Row>>
where
    S: DocumentStore + Clone,
    T: Projection,
{
    let (items, total) = Repository::<S, T>::new(store.clone()).page(filter, request).await?;
    let rows = project_all(store, items).await;
    Ok(Page::new(rows, request, total))
}

pub async fn project_one<S, T>(store: &S, id: &DocumentId) -> DomainResult<T::Row>
where
    S: DocumentStore + Clone,
    T: Projection,
{
    let item = Repository::<S, T>::new(store.clone()).get(id).await?;
    let mut rows = project_all(store, vec![item]).await;
    rows.pop()
        .ok_or_else(|| polaris_core::DomainError::internal("projection produced no row"))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use polaris_core::timestamp;
    use polaris_parties::{Customer, CustomerInput, customer_code};
    use polaris_sales::{OrderItemInput, SalesOrder, SalesOrderInput};

    use super::*;
    use crate::store::InMemoryDocumentStore;

    type Store = Arc<InMemoryDocumentStore>;

    async fn seeded(orders: usize) -> (Store, Customer) {
        let store: Store = Arc::new(InMemoryDocumentStore::new());
        let customer = Customer::create(
            CustomerInput { name: "Acme".into(), ..CustomerInput::default() },
            customer_code(2024, 0),
            timestamp::now(),
        )
        .unwrap();
        Repository::<Store, Customer>::new(store.clone()).insert(&customer).await.unwrap();

        let repo = Repository::<Store, SalesOrder>::new(store.clone());
        for _ in 0..orders {
            let order = SalesOrder::create(
                SalesOrderInput {
                    project_id: DocumentId::new(),
                    customer_id: customer.id,
                    items: vec![OrderItemInput {
                        product_id: None,
                        description: "split type".into(),
                        quantity: 1,
                        uom: "pc".into(),
                        price: 100,
                    }],
                },
                None,
                timestamp::now(),
            )
            .unwrap();
            repo.insert(&order).await.unwrap();
        }
        (store, customer)
    }

    #[tokio::test]
    async fn page_rows_resolve_names_and_degrade_missing_refs() {
        let (store, _) = seeded(3).await;
        let page = project_page::<Store, SalesOrder>(&store, &Filter::new(), PageRequest::new(Some(1), Some(2)))
            .await
            .unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 2);
        for row in &page.items {
            assert_eq!(row.customer_name, "Acme");
            assert_eq!(row.project_name, "");
        }
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty_with_total_intact() {
        let (store, _) = seeded(3).await;
        let page = project_page::<Store, SalesOrder>(&store, &Filter::new(), PageRequest::new(Some(3), Some(2)))
            .await
            .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total, 3);
        assert_eq!(page.page, 3);

        let (items, total) = Repository::<Store, SalesOrder>::new(store)
            .page(&Filter::new(), PageRequest::new(Some(i64::MAX), Some(10)))
            .await
            .unwrap();
        assert!(items.is_empty());
        assert_eq!(total, 3);
    }

    #[tokio::test]
    async fn one_document_resolves_like_a_page() {
        let (store, customer) = seeded(1).await;
        let filter = Filter::new().eq("customer_id", crate::store::id_value(&customer.id));
        let order = Repository::<Store, SalesOrder>::new(store.clone())
            .find_one(&filter)
            .await
            .unwrap()
            .unwrap();
        let row = project_one::<Store, SalesOrder>(&store, &order.id).await.unwrap();
        assert_eq!(row.customer_name, "Acme");
        assert_eq!(row.total_amount, 100);
    }
}
