//! Typed access to one collection.

use std::marker::PhantomData;

use polaris_core::{DocumentId, DomainError, DomainResult, Entity, PageRequest};

use crate::store::{
    DocumentStore, Filter, FindOptions, ID_FIELD, Sort, from_document, to_document,
};

pub struct Repository<S, T> {
    store: S,
    _entity: PhantomData<fn() -> T>,
}

impl<S, T> Repository<S, T>
where
    S: DocumentStore,
    T: Entity,
{
    pub fn new(store: S) -> Self {
        Self { store, _entity: PhantomData }
    }

    pub async fn insert(&self, entity: &T) -> DomainResult<DocumentId> {
        let id = self.store.insert(T::COLLECTION, to_document(entity)?).await?;
        tracing::info!(id = %id, collection = T::COLLECTION, "document created");
        Ok(id)
    }

    pub async fn get(&self, id: &DocumentId) -> DomainResult<T> {
        let doc = self.store.get(T::COLLECTION, id).await?;
        Ok(from_document(doc)?)
    }

    /// Like [`get`](Self::get) but a missing document is `InvalidReference`;
    /// used when a write depends on another document existing.
    pub async fn get_reference(&self, id: &DocumentId) -> DomainResult<T> {
        match self.get(id).await {
            Err(DomainError::NotFound(_)) => Err(DomainError::invalid_reference(format!(
                "{} {id} does not exist",
                T::COLLECTION
            ))),
            other => other,
        }
    }

    pub async fn find(&self, filter: &Filter, options: FindOptions) -> DomainResult<Vec<T>> {
        let docs = self.store.find(T::COLLECTION, filter, options).await?;
        docs.into_iter()
            .map(|d| from_document(d).map_err(DomainError::from))
            .collect()
    }

    pub async fn find_one(&self, filter: &Filter) -> DomainResult<Option<T>> {
        let mut found = self.find(filter, FindOptions { limit: Some(1), ..FindOptions::default() }).await?;
        Ok(found.pop())
    }

    /// Most recently created match.
    pub async fn latest(&self, filter: &Filter) -> DomainResult<Option<T>> {
        let mut found = self
            .find(filter, FindOptions::sorted(Sort::newest_first()).window(0, 1))
            .await?;
        Ok(found.pop())
    }

    pub async fn count(&self, filter: &Filter) -> DomainResult<u64> {
        Ok(self.store.count(T::COLLECTION, filter).await?)
    }

    /// Newest-first page plus the total independent of the window.
    pub async fn page(&self, filter: &Filter, request: PageRequest) -> DomainResult<(Vec<T>, u64)> {
        let total = self.count(filter).await?;
        let items = self
            .find(
                filter,
                FindOptions::sorted(Sort::newest_first()).window(request.skip(), request.limit()),
            )
            .await?;
        Ok((items, total))
    }

    /// Full replacement of every stored field.
    pub async fn save(&self, entity: &T) -> DomainResult<()> {
        let id = entity.id();
        let mut patch = to_document(entity)?;
        patch.remove(ID_FIELD);
        match self.store.update(T::COLLECTION, &id, patch).await? {
            0 => Err(DomainError::not_found(format!("{} {id} not found", T::COLLECTION))),
            _ => Ok(()),
        }
    }

    pub async fn delete(&self, id: &DocumentId) -> DomainResult<()> {
        match self.store.delete(T::COLLECTION, id).await? {
            0 => Err(DomainError::not_found(format!("{} {id} not found", T::COLLECTION))),
            _ => {
                tracing::info!(id = %id, collection = T::COLLECTION, "document deleted");
                Ok(())
            }
        }
    }
}
