//! Read shapes for every list view that shows another document's fields.
//!
//! Foreign ids are dropped from the rows unless the consumer needs them to
//! navigate (sales invoices keep `{id, name}` pairs).

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use polaris_core::{DocumentId, Lifecycle, collections, timestamp};
use polaris_inventory::ReceivingReport;
use polaris_parties::Project;
use polaris_purchasing::{PoItem, SupplierDeliveryReceipt, SupplierDrItem, SupplierInvoice, SupplierInvoiceItem, SupplierPo};
use polaris_sales::{
    CustomerSnapshot, DeliveryItem, DeliveryReceipt, InvoiceItem, OrderItem, Quotation, QuotationItem, SalesInvoice,
    SalesOrder,
};

use super::{Projection, RefSet, ResolvedRefs};

const NAME: &str = "name";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectRow {
    pub id: DocumentId,
    pub name: String,
    pub reference_code: String,
    pub customer_name: String,
    pub customer_organization: String,
    pub notes: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Projection for Project {
    type Row = ProjectRow;

    fn references(&self, refs: &mut RefSet) {
        refs.add_opt(collections::CUSTOMER, self.customer_id);
    }

    fn project(self, refs: &ResolvedRefs) -> ProjectRow {
        ProjectRow {
            id: self.id,
            customer_name: refs.text_opt(collections::CUSTOMER, self.customer_id.as_ref(), NAME),
            name: self.name,
            reference_code: self.reference_code,
            customer_organization: self.customer_organization,
            notes: self.notes,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesOrderRow {
    pub id: DocumentId,
    pub sales_order_no: String,
    pub project_name: String,
    pub customer_name: String,
    pub items: Vec<OrderItem>,
    pub total_amount: i64,
    pub status: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Projection for SalesOrder {
    type Row = SalesOrderRow;

    fn references(&self, refs: &mut RefSet) {
        refs.add(collections::PROJECT, self.project_id);
        refs.add(collections::CUSTOMER, self.customer_id);
    }

    fn project(self, refs: &ResolvedRefs) -> SalesOrderRow {
        SalesOrderRow {
            id: self.id,
            project_name: refs.text(collections::PROJECT, &self.project_id, NAME),
            customer_name: refs.text(collections::CUSTOMER, &self.customer_id, NAME),
            sales_order_no: self.sales_order_no,
            items: self.items,
            total_amount: self.total_amount,
            status: self.status.as_str().to_string(),
            created_at: self.created_at,
        }
    }
}

/// `{id, name}` pair for a navigable reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefView {
    pub id: DocumentId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRefView {
    pub id: DocumentId,
    pub number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesInvoiceRow {
    pub id: DocumentId,
    pub invoice_no: String,
    pub project: RefView,
    pub customer: RefView,
    pub sales_order: OrderRefView,
    pub items: Vec<InvoiceItem>,
    pub total_amount: i64,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Projection for SalesInvoice {
    type Row = SalesInvoiceRow;

    fn references(&self, refs: &mut RefSet) {
        refs.add(collections::PROJECT, self.project_id);
        refs.add(collections::CUSTOMER, self.customer_id);
        refs.add(collections::SALES_ORDER, self.sales_order_id);
    }

    fn project(self, refs: &ResolvedRefs) -> SalesInvoiceRow {
        SalesInvoiceRow {
            id: self.id,
            invoice_no: self.invoice_no,
            project: RefView {
                id: self.project_id,
                name: refs.text(collections::PROJECT, &self.project_id, NAME),
            },
            customer: RefView {
                id: self.customer_id,
                name: refs.text(collections::CUSTOMER, &self.customer_id, NAME),
            },
            sales_order: OrderRefView {
                id: self.sales_order_id,
                number: refs.text(collections::SALES_ORDER, &self.sales_order_id, "sales_order_no"),
            },
            items: self.items,
            total_amount: self.total_amount,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveryReceiptRow {
    pub id: DocumentId,
    pub dr_number: String,
    pub project_name: String,
    pub sales_order_no: String,
    pub invoice_no: String,
    pub customer: CustomerSnapshot,
    pub items: Vec<DeliveryItem>,
    pub status: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Projection for DeliveryReceipt {
    type Row = DeliveryReceiptRow;

    fn references(&self, refs: &mut RefSet) {
        refs.add(collections::PROJECT, self.project_id);
        refs.add(collections::SALES_ORDER, self.sales_order_id);
        refs.add(collections::SALES_INVOICE, self.sales_invoice_id);
    }

    fn project(self, refs: &ResolvedRefs) -> DeliveryReceiptRow {
        DeliveryReceiptRow {
            id: self.id,
            dr_number: self.dr_number,
            project_name: refs.text(collections::PROJECT, &self.project_id, NAME),
            sales_order_no: refs.text(collections::SALES_ORDER, &self.sales_order_id, "sales_order_no"),
            invoice_no: refs.text(collections::SALES_INVOICE, &self.sales_invoice_id, "invoice_no"),
            customer: self.customer,
            items: self.items,
            status: self.status.as_str().to_string(),
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuotationRow {
    pub id: DocumentId,
    pub quotation_no: String,
    pub project_name: String,
    pub customer_name: String,
    pub items: Vec<QuotationItem>,
    pub total_amount: i64,
    pub status: String,
    #[serde(with = "timestamp::option")]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Projection for Quotation {
    type Row = QuotationRow;

    fn references(&self, refs: &mut RefSet) {
        refs.add_opt(collections::PROJECT, self.project_id);
        refs.add_opt(collections::CUSTOMER, self.customer_id);
    }

    fn project(self, refs: &ResolvedRefs) -> QuotationRow {
        QuotationRow {
            id: self.id,
            quotation_no: self.quotation_no,
            project_name: refs.text_opt(collections::PROJECT, self.project_id.as_ref(), NAME),
            customer_name: refs.text_opt(collections::CUSTOMER, self.customer_id.as_ref(), NAME),
            items: self.items,
            total_amount: self.total_amount,
            status: self.status.as_str().to_string(),
            approved_at: self.approved_at,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplierPoRow {
    pub id: DocumentId,
    pub po_no: String,
    pub project_name: String,
    pub supplier_name: String,
    pub sales_order_no: String,
    pub customer_po_ids: Vec<String>,
    pub items: Vec<PoItem>,
    pub total_amount: i64,
    pub status: String,
    #[serde(with = "timestamp::option")]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Projection for SupplierPo {
    type Row = SupplierPoRow;

    fn references(&self, refs: &mut RefSet) {
        refs.add(collections::PROJECT, self.project_id);
        refs.add(collections::SUPPLIER, self.supplier_id);
        refs.add_opt(collections::SALES_ORDER, self.sales_order_id);
    }

    fn project(self, refs: &ResolvedRefs) -> SupplierPoRow {
        SupplierPoRow {
            id: self.id,
            po_no: self.po_no,
            project_name: refs.text(collections::PROJECT, &self.project_id, NAME),
            supplier_name: refs.text(collections::SUPPLIER, &self.supplier_id, NAME),
            sales_order_no: refs.text_opt(collections::SALES_ORDER, self.sales_order_id.as_ref(), "sales_order_no"),
            customer_po_ids: self.customer_po_ids,
            items: self.items,
            total_amount: self.total_amount,
            status: self.status.as_str().to_string(),
            approved_at: self.approved_at,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplierInvoiceRow {
    pub id: DocumentId,
    pub invoice_no: String,
    pub project_name: String,
    pub supplier_name: String,
    pub invoice_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub purchase_order_no: String,
    pub items: Vec<SupplierInvoiceItem>,
    pub total_sales: i64,
    pub vat: i64,
    pub grand_total: i64,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Projection for SupplierInvoice {
    type Row = SupplierInvoiceRow;

    fn references(&self, refs: &mut RefSet) {
        refs.add(collections::PROJECT, self.project_id);
        refs.add(collections::SUPPLIER, self.supplier_id);
    }

    fn project(self, refs: &ResolvedRefs) -> SupplierInvoiceRow {
        SupplierInvoiceRow {
            id: self.id,
            invoice_no: self.invoice_no,
            project_name: refs.text(collections::PROJECT, &self.project_id, NAME),
            supplier_name: refs.text(collections::SUPPLIER, &self.supplier_id, NAME),
            invoice_date: self.invoice_date,
            due_date: self.due_date,
            purchase_order_no: self.purchase_order_no,
            items: self.items,
            total_sales: self.total_sales,
            vat: self.vat,
            grand_total: self.grand_total,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplierDrRow {
    pub id: DocumentId,
    pub supplier_dr_no: String,
    pub project_name: String,
    pub supplier_name: String,
    pub your_po_no: String,
    pub date: Option<NaiveDate>,
    pub dispatch_date: Option<NaiveDate>,
    pub ship_to: String,
    pub received_by: String,
    pub items: Vec<SupplierDrItem>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Projection for SupplierDeliveryReceipt {
    type Row = SupplierDrRow;

    fn references(&self, refs: &mut RefSet) {
        refs.add(collections::PROJECT, self.project_id);
        refs.add(collections::SUPPLIER, self.supplier_id);
    }

    fn project(self, refs: &ResolvedRefs) -> SupplierDrRow {
        SupplierDrRow {
            id: self.id,
            supplier_dr_no: self.supplier_dr_no,
            project_name: refs.text(collections::PROJECT, &self.project_id, NAME),
            supplier_name: refs.text(collections::SUPPLIER, &self.supplier_id, NAME),
            your_po_no: self.your_po_no,
            date: self.date,
            dispatch_date: self.dispatch_date,
            ship_to: self.ship_to,
            received_by: self.received_by,
            items: self.items,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReceivingReportRow {
    pub id: DocumentId,
    pub sku: String,
    pub model_number: String,
    pub name: String,
    pub quantity: i64,
    pub price: i64,
    pub sales_order_no: String,
    pub po_no: String,
    pub supplier_invoice_no: String,
    pub supplier_dr_no: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Projection for ReceivingReport {
    type Row = ReceivingReportRow;

    fn references(&self, refs: &mut RefSet) {
        refs.add_opt(collections::SALES_ORDER, self.sales_order_id);
        refs.add_opt(collections::SUPPLIER_PO, self.supplier_po_id);
        refs.add_opt(collections::SUPPLIER_INVOICE, self.supplier_invoice_id);
        refs.add_opt(collections::SUPPLIER_DR, self.supplier_dr_id);
    }

    fn project(self, refs: &ResolvedRefs) -> ReceivingReportRow {
        ReceivingReportRow {
            id: self.id,
            sales_order_no: refs.text_opt(collections::SALES_ORDER, self.sales_order_id.as_ref(), "sales_order_no"),
            po_no: refs.text_opt(collections::SUPPLIER_PO, self.supplier_po_id.as_ref(), "po_no"),
            supplier_invoice_no: refs.text_opt(
                collections::SUPPLIER_INVOICE,
                self.supplier_invoice_id.as_ref(),
                "invoice_no",
            ),
            supplier_dr_no: refs.text_opt(collections::SUPPLIER_DR, self.supplier_dr_id.as_ref(), "supplier_dr_no"),
            sku: self.sku,
            model_number: self.model_number,
            name: self.name,
            quantity: self.quantity,
            price: self.price,
            created_at: self.created_at,
        }
    }
}
