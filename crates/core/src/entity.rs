//! Entity trait: identity + the collection a document kind lives in.

use serde::{Serialize, de::DeserializeOwned};

use crate::DocumentId;

/// A top-level stored document kind.
///
/// Entities reference each other by [`DocumentId`] only; they are never embedded.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync {
    /// Storage collection name.
    const COLLECTION: &'static str;

    fn id(&self) -> DocumentId;
}

/// Collection names, one per entity kind.
pub mod collections {
    pub const PROJECT: &str = "project";
    pub const CUSTOMER: &str = "customer";
    pub const SUPPLIER: &str = "supplier";
    pub const SALES_ORDER: &str = "salesorder";
    pub const SALES_INVOICE: &str = "sales_invoices";
    pub const DELIVERY_RECEIPT: &str = "delivery_receipts";
    pub const QUOTATION: &str = "quotations";
    pub const SUPPLIER_PO: &str = "supplier_purchase_orders";
    pub const SUPPLIER_INVOICE: &str = "supplierinvoice";
    pub const SUPPLIER_DR: &str = "supplierdeliveryreceipt";
    pub const INVENTORY: &str = "polaris_inventory";
    pub const RECEIVING_REPORT: &str = "polaris_receiving_reports";
    pub const USER: &str = "user";
    pub const PENDING_USER: &str = "pendinguser";
    pub const ROLE: &str = "role";
}
