//! Sales side of the document chain: orders, invoices, delivery receipts and
//! quotations.
//!
//! This crate contains business rules only (no IO, no HTTP, no storage).

pub mod delivery;
pub mod invoice;
pub mod order;
pub mod quotation;

pub use delivery::{CustomerSnapshot, DeliveryItem, DeliveryReceipt, DeliveryStatus};
pub use invoice::{InvoiceItem, InvoiceItemInput, SalesInvoice, SalesInvoiceInput, requested_skus};
pub use order::{
    OrderItem, OrderItemInput, SalesOrder, SalesOrderInput, SalesOrderStatus, SalesOrderUpdate,
};
pub use quotation::{Quotation, QuotationInput, QuotationItem, QuotationItemInput, QuotationStatus};
