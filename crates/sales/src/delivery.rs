use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use polaris_core::{
    DocumentId, DomainError, DomainResult, Entity, Lifecycle, Transition, collections, lifecycle,
    timestamp,
};
use polaris_parties::Customer;

use crate::invoice::SalesInvoice;

/// `Ready -> Issued`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryStatus {
    Ready,
    Issued,
}

impl DeliveryStatus {
    pub fn parse(raw: &str) -> DomainResult<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "ready" => Ok(Self::Ready),
            "issued" => Ok(Self::Issued),
            _ => Err(DomainError::invalid_argument(format!(
                "unknown delivery receipt status '{raw}'"
            ))),
        }
    }
}

impl Lifecycle for DeliveryStatus {
    fn allows(self, to: Self) -> bool {
        matches!((self, to), (Self::Ready, Self::Issued))
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "Ready",
            Self::Issued => "Issued",
        }
    }
}

/// Customer details frozen at receipt creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerSnapshot {
    pub name: String,
    pub organization: String,
    pub tin: String,
    pub address: String,
}

impl From<&Customer> for CustomerSnapshot {
    fn from(c: &Customer) -> Self {
        Self {
            name: c.name.clone(),
            organization: c.organization.clone(),
            tin: c.tin.clone(),
            address: c.address.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryItem {
    pub sku: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub dr_number: String,
    pub project_id: DocumentId,
    pub customer_id: DocumentId,
    pub sales_order_id: DocumentId,
    pub sales_invoice_id: DocumentId,
    pub customer: CustomerSnapshot,
    pub items: Vec<DeliveryItem>,
    pub status: DeliveryStatus,
    pub created_by: Option<DocumentId>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl DeliveryReceipt {
    /// Build a receipt for `invoice`, copying its lines and the customer's
    /// current details.
    pub fn from_invoice(
        invoice: &SalesInvoice,
        customer: &Customer,
        created_by: Option<DocumentId>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if customer.id != invoice.customer_id {
            return Err(DomainError::invalid_reference(
                "customer does not match the sales invoice",
            ));
        }
        Ok(Self {
            id: DocumentId::new(),
            dr_number: format!("DR-{}", timestamp::compact(&now)),
            project_id: invoice.project_id,
            customer_id: invoice.customer_id,
            sales_order_id: invoice.sales_order_id,
            sales_invoice_id: invoice.id,
            customer: CustomerSnapshot::from(customer),
            items: invoice
                .items
                .iter()
                .map(|i| DeliveryItem {
                    sku: i.sku.clone(),
                    quantity: i.quantity,
                })
                .collect(),
            status: DeliveryStatus::Ready,
            created_by,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn set_status(
        &mut self,
        to: DeliveryStatus,
        now: DateTime<Utc>,
    ) -> DomainResult<Transition<DeliveryStatus>> {
        let t = lifecycle::transition(self.status, to)?;
        if t.is_move() {
            self.status = to;
            self.updated_at = now;
        }
        Ok(t)
    }
}

impl Entity for DeliveryReceipt {
    const COLLECTION: &'static str = collections::DELIVERY_RECEIPT;

    fn id(&self) -> DocumentId {
        self.id
    }
}
