use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use polaris_core::{
    DocumentId, DomainResult, Entity, collections, timestamp,
    validation::{non_negative, required},
};

/// Goods received from a supplier, tied back to the procurement and sales
/// documents that explain it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceivingReport {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub sku: String,
    #[serde(default)]
    pub barcode: String,
    #[serde(default)]
    pub model_number: String,
    #[serde(default)]
    pub name: String,
    pub quantity: i64,
    pub price: i64,
    pub supplier_dr_id: Option<DocumentId>,
    pub supplier_invoice_id: Option<DocumentId>,
    pub supplier_po_id: Option<DocumentId>,
    pub sales_order_id: Option<DocumentId>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReceivingReportInput {
    pub sku: String,
    #[serde(default)]
    pub barcode: String,
    #[serde(default)]
    pub model_number: String,
    #[serde(default)]
    pub name: String,
    pub quantity: i64,
    pub price: i64,
    pub supplier_dr_id: Option<DocumentId>,
    pub supplier_invoice_id: Option<DocumentId>,
    pub supplier_po_id: Option<DocumentId>,
    pub sales_order_id: Option<DocumentId>,
}

impl ReceivingReport {
    pub fn create(input: ReceivingReportInput, now: DateTime<Utc>) -> DomainResult<Self> {
        Ok(Self {
            id: DocumentId::new(),
            sku: required("sku", &input.sku)?,
            barcode: input.barcode.trim().to_string(),
            model_number: input.model_number.trim().to_string(),
            name: input.name.trim().to_string(),
            quantity: non_negative("quantity", input.quantity)?,
            price: non_negative("price", input.price)?,
            supplier_dr_id: input.supplier_dr_id,
            supplier_invoice_id: input.supplier_invoice_id,
            supplier_po_id: input.supplier_po_id,
            sales_order_id: input.sales_order_id,
            created_at: now,
            updated_at: now,
        })
    }
}

impl Entity for ReceivingReport {
    const COLLECTION: &'static str = collections::RECEIVING_REPORT;

    fn id(&self) -> DocumentId {
        self.id
    }
}
