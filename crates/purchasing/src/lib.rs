//! Procurement side of the document chain: supplier purchase orders, supplier
//! invoices and supplier delivery receipts.
//!
//! This crate contains business rules only (no IO, no HTTP, no storage).

pub mod delivery;
pub mod invoice;
pub mod order;

pub use delivery::{SupplierDeliveryReceipt, SupplierDrInput, SupplierDrItem};
pub use invoice::{SupplierInvoice, SupplierInvoiceInput, SupplierInvoiceItem, SupplierInvoiceItemInput};
pub use order::{PoItem, PoItemInput, PoStatus, SupplierPo, SupplierPoInput, SupplierPoUpdate};
