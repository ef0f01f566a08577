//! Order → invoice → receipt progress for a sales order.
//!
//! The three writes are independent and never rolled back. This view tells a
//! caller which step is missing so an interrupted flow can be resumed.

use serde::Serialize;

use polaris_core::{DocumentId, DomainResult, Entity};
use polaris_sales::{DeliveryReceipt, SalesInvoice, SalesOrder};

use crate::repository::Repository;
use crate::store::{DocumentStore, Filter, id_value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FulfillmentStage {
    Ordered,
    Invoiced,
    Receipted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NextStep {
    CreateInvoice,
    CreateDeliveryReceipt,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FulfillmentStatus {
    pub sales_order_id: DocumentId,
    pub stage: FulfillmentStage,
    pub sales_invoice_id: Option<DocumentId>,
    pub delivery_receipt_id: Option<DocumentId>,
    pub next_step: NextStep,
}

#[derive(Clone)]
pub struct FulfillmentService<S> {
    store: S,
}

impl<S: DocumentStore + Clone> FulfillmentService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn fulfillment_status(&self, sales_order_id: &DocumentId) -> DomainResult<FulfillmentStatus> {
        let order = Repository::<S, SalesOrder>::new(self.store.clone()).get(sales_order_id).await?;
        let by_order = Filter::new().eq("sales_order_id", id_value(&order.id()));

        let invoice = Repository::<S, SalesInvoice>::new(self.store.clone()).latest(&by_order).await?;
        let receipt = Repository::<S, DeliveryReceipt>::new(self.store.clone()).latest(&by_order).await?;

        let (stage, next_step) = match (&invoice, &receipt) {
            (_, Some(_)) => (FulfillmentStage::Receipted, NextStep::Complete),
            (Some(_), None) => (FulfillmentStage::Invoiced, NextStep::CreateDeliveryReceipt),
            (None, None) => (FulfillmentStage::Ordered, NextStep::CreateInvoice),
        };
        tracing::debug!(sales_order_id = %order.id(), ?stage, "fulfillment status");

        Ok(FulfillmentStatus {
            sales_order_id: order.id(),
            stage,
            sales_invoice_id: invoice.map(|i| i.id()),
            delivery_receipt_id: receipt.map(|r| r.id()),
            next_step,
        })
    }
}
