use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use polaris_core::{
    CatalogLine, DocumentId, DomainResult, Entity, LineItem, PriceCatalog, collections, timestamp,
    totals, validation::required,
};

/// Invoice line. `unit_price` is a snapshot of the catalog price at the time
/// the invoice was written; later catalog edits never reach it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub sku: String,
    pub quantity: i64,
    pub unit_price: i64,
    pub amount: i64,
}

impl LineItem for InvoiceItem {
    fn quantity(&self) -> i64 {
        self.quantity
    }
    fn price(&self) -> i64 {
        self.unit_price
    }
    fn amount(&self) -> i64 {
        self.amount
    }
    fn set_amount(&mut self, amount: i64) {
        self.amount = amount;
    }
}

impl CatalogLine for InvoiceItem {
    fn sku(&self) -> &str {
        &self.sku
    }
    fn set_price(&mut self, price: i64) {
        self.unit_price = price;
    }
}

/// Requested line; any caller price is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceItemInput {
    pub sku: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SalesInvoiceInput {
    pub project_id: DocumentId,
    pub customer_id: DocumentId,
    pub sales_order_id: DocumentId,
    pub items: Vec<InvoiceItemInput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesInvoice {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub invoice_no: String,
    pub project_id: DocumentId,
    pub customer_id: DocumentId,
    pub sales_order_id: DocumentId,
    pub items: Vec<InvoiceItem>,
    pub total_amount: i64,
    pub created_by: Option<DocumentId>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

/// Distinct SKUs of a request, for a single catalog query.
pub fn requested_skus(items: &[InvoiceItemInput]) -> Vec<String> {
    items
        .iter()
        .map(|i| i.sku.trim().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn price_items(
    items: Vec<InvoiceItemInput>,
    catalog: &impl PriceCatalog,
) -> DomainResult<(Vec<InvoiceItem>, i64)> {
    let mut lines = items
        .into_iter()
        .map(|i| {
            Ok(InvoiceItem {
                sku: required("sku", &i.sku)?,
                quantity: i.quantity,
                unit_price: 0,
                amount: 0,
            })
        })
        .collect::<DomainResult<Vec<_>>>()?;
    let total = totals::recompute_from_catalog(&mut lines, catalog)?;
    Ok((lines, total))
}

impl SalesInvoice {
    pub fn create(
        input: SalesInvoiceInput,
        catalog: &impl PriceCatalog,
        created_by: Option<DocumentId>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let (items, total_amount) = price_items(input.items, catalog)?;
        Ok(Self {
            id: DocumentId::new(),
            invoice_no: format!("INV-{}", timestamp::compact(&now)),
            project_id: input.project_id,
            customer_id: input.customer_id,
            sales_order_id: input.sales_order_id,
            items,
            total_amount,
            created_by,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replace the items, re-pricing every line from the current catalog.
    pub fn revise(
        &mut self,
        items: Vec<InvoiceItemInput>,
        catalog: &impl PriceCatalog,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        let (items, total) = price_items(items, catalog)?;
        self.items = items;
        self.total_amount = total;
        self.updated_at = now;
        Ok(())
    }
}

impl Entity for SalesInvoice {
    const COLLECTION: &'static str = collections::SALES_INVOICE;

    fn id(&self) -> DocumentId {
        self.id
    }
}
