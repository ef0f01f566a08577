use std::collections::HashMap;

use polaris_core::{DocumentId, DomainError, DomainResult, Page, PageRequest, timestamp};
use polaris_inventory::{InventoryInput, InventoryItem, ReceivingReport, ReceivingReportInput};

use crate::projections::{project_one, project_page, views::ReceivingReportRow};
use crate::repository::Repository;
use crate::store::{DocumentStore, Filter, FindOptions};

#[derive(Clone)]
pub struct InventoryService<S> {
    store: S,
}

impl<S: DocumentStore + Clone> InventoryService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn items(&self) -> Repository<S, InventoryItem> {
        Repository::new(self.store.clone())
    }

    fn receiving(&self) -> Repository<S, ReceivingReport> {
        Repository::new(self.store.clone())
    }

    async fn ensure_sku_free(&self, sku: &str, owner: Option<&DocumentId>) -> DomainResult<()> {
        let sku = sku.trim();
        match self.items().find_one(&Filter::new().eq("sku", sku)).await? {
            Some(existing) if Some(&existing.id) != owner => {
                Err(DomainError::conflict(format!("SKU {sku} already exists")))
            }
            _ => Ok(()),
        }
    }

    pub async fn create(&self, input: InventoryInput, actor: Option<DocumentId>) -> DomainResult<InventoryItem> {
        self.ensure_sku_free(&input.sku, None).await?;
        let item = InventoryItem::create(input, actor, timestamp::now())?;
        self.items().insert(&item).await?;
        Ok(item)
    }

    /// Catalog edits never touch invoices already issued; those carry a price snapshot.
    pub async fn update(&self, id: &DocumentId, input: InventoryInput) -> DomainResult<InventoryItem> {
        let mut item = self.items().get(id).await?;
        self.ensure_sku_free(&input.sku, Some(id)).await?;
        item.update(input, timestamp::now())?;
        self.items().save(&item).await?;
        Ok(item)
    }

    pub async fn get(&self, id: &DocumentId) -> DomainResult<InventoryItem> {
        self.items().get(id).await
    }

    pub async fn get_by_sku(&self, sku: &str) -> DomainResult<InventoryItem> {
        self.items()
            .find_one(&Filter::new().eq("sku", sku.trim()))
            .await?
            .ok_or_else(|| DomainError::not_found(format!("SKU {sku} not found")))
    }

    pub async fn delete(&self, id: &DocumentId) -> DomainResult<()> {
        self.items().delete(id).await
    }

    pub async fn list(&self, request: PageRequest) -> DomainResult<Page<InventoryItem>> {
        let (items, total) = self.items().page(&Filter::new(), request).await?;
        Ok(Page::new(items, request, total))
    }

    /// SKU → current catalog price for the given SKUs, in one query.
    pub async fn catalog(&self, skus: &[String]) -> DomainResult<HashMap<String, i64>> {
        if skus.is_empty() {
            return Ok(HashMap::new());
        }
        let items = self
            .items()
            .find(&Filter::new().is_in("sku", skus.iter().cloned()), FindOptions::default())
            .await?;
        Ok(items.into_iter().map(|i| (i.sku, i.price)).collect())
    }

    pub async fn create_receiving_report(&self, input: ReceivingReportInput) -> DomainResult<ReceivingReport> {
        let report = ReceivingReport::create(input, timestamp::now())?;
        self.receiving().insert(&report).await?;
        Ok(report)
    }

    pub async fn get_receiving_report(&self, id: &DocumentId) -> DomainResult<ReceivingReportRow> {
        project_one::<S, ReceivingReport>(&self.store, id).await
    }

    pub async fn delete_receiving_report(&self, id: &DocumentId) -> DomainResult<()> {
        self.receiving().delete(id).await
    }

    pub async fn list_receiving_reports(&self, request: PageRequest) -> DomainResult<Page<ReceivingReportRow>> {
        project_page::<S, ReceivingReport>(&self.store, &Filter::new(), request).await
    }
}
