use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use polaris_core::{
    DocumentId, DomainError, DomainResult, Entity, LineItem, collections, timestamp, totals,
    validation::{non_negative, required},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierInvoiceItem {
    pub description: String,
    pub quantity: i64,
    #[serde(default)]
    pub unit: String,
    pub unit_price: i64,
    pub amount: i64,
}

impl LineItem for SupplierInvoiceItem {
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

#[derive(Debug, Clone, Deserialize)]
pub struct SupplierInvoiceItemInput {
    pub description: String,
    pub quantity: i64,
    #[serde(default)]
    pub unit: String,
    pub unit_price: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SupplierInvoiceInput {
    pub supplier_id: DocumentId,
    pub project_id: DocumentId,
    pub invoice_no: String,
    pub invoice_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub delivery_no: String,
    #[serde(default)]
    pub sap_ref_no: String,
    #[serde(default)]
    pub purchase_order_no: String,
    #[serde(default)]
    pub delivery_address: String,
    pub items: Vec<SupplierInvoiceItemInput>,
    /// Tax amount as billed by the supplier, minor units.
    #[serde(default)]
    pub vat: i64,
}

/// Invoice received from a supplier.
///
/// `total_sales` is the sum of line amounts and `grand_total = total_sales + vat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierInvoice {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub supplier_id: DocumentId,
    pub project_id: DocumentId,
    pub invoice_no: String,
    pub invoice_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub delivery_no: String,
    #[serde(default)]
    pub sap_ref_no: String,
    #[serde(default)]
    pub purchase_order_no: String,
    #[serde(default)]
    pub delivery_address: String,
    pub items: Vec<SupplierInvoiceItem>,
    pub total_sales: i64,
    pub vat: i64,
    pub grand_total: i64,
    pub created_by: Option<DocumentId>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl SupplierInvoice {
    pub fn create(
        input: SupplierInvoiceInput,
        created_by: Option<DocumentId>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let mut invoice = Self {
            id: DocumentId::new(),
            supplier_id: input.supplier_id,
            project_id: input.project_id,
            invoice_no: String::new(),
            invoice_date: input.invoice_date,
            due_date: None,
            delivery_no: String::new(),
            sap_ref_no: String::new(),
            purchase_order_no: String::new(),
            delivery_address: String::new(),
            items: Vec::new(),
            total_sales: 0,
            vat: 0,
            grand_total: 0,
            created_by,
            created_at: now,
            updated_at: now,
        };
        invoice.update(input, now)?;
        Ok(invoice)
    }

    /// Full replacement of the invoice body; totals are recomputed.
    pub fn update(&mut self, input: SupplierInvoiceInput, now: DateTime<Utc>) -> DomainResult<()> {
        if let Some(due) = input.due_date {
            if due < input.invoice_date {
                return Err(DomainError::invalid_argument("due_date is before invoice_date"));
            }
        }
        let mut items: Vec<SupplierInvoiceItem> = input
            .items
            .into_iter()
            .map(|i| SupplierInvoiceItem {
                description: i.description.trim().to_string(),
                quantity: i.quantity,
                unit: i.unit.trim().to_string(),
                unit_price: i.unit_price,
                amount: 0,
            })
            .collect();
        let total_sales = totals::recompute(&mut items)?;
        let vat = non_negative("vat", input.vat)?;
        let grand_total = total_sales
            .checked_add(vat)
            .ok_or_else(|| DomainError::invalid_argument("grand total overflows"))?;

        self.invoice_no = required("invoice_no", &input.invoice_no)?;
        self.supplier_id = input.supplier_id;
        self.project_id = input.project_id;
        self.invoice_date = input.invoice_date;
        self.due_date = input.due_date;
        self.delivery_no = input.delivery_no.trim().to_string();
        self.sap_ref_no = input.sap_ref_no.trim().to_string();
        self.purchase_order_no = input.purchase_order_no.trim().to_string();
        self.delivery_address = input.delivery_address.trim().to_string();
        self.items = items;
        self.total_sales = total_sales;
        self.vat = vat;
        self.grand_total = grand_total;
        self.updated_at = now;
        Ok(())
    }

    /// Invoice date as the start of that day, UTC.
    pub fn invoice_instant(&self) -> DateTime<Utc> {
        self.invoice_date
            .and_hms_opt(0, 0, 0)
            .map(|d| d.and_utc())
            .unwrap_or(self.created_at)
    }
}

impl Entity for SupplierInvoice {
    const COLLECTION: &'static str = collections::SUPPLIER_INVOICE;

    fn id(&self) -> DocumentId {
        self.id
    }
}
