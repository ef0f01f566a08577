use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use polaris_core::{
    DocumentId, DomainResult, Entity, LineItem, Lifecycle, collections, lifecycle, timestamp, totals,
};

/// Sales order status.
///
/// Both directions are legal; the status is re-settable at will by an
/// authorized edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SalesOrderStatus {
    NotApproved,
    Approved,
}

impl SalesOrderStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "notapproved" => Some(Self::NotApproved),
            "approved" => Some(Self::Approved),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotApproved => "notapproved",
            Self::Approved => "approved",
        }
    }
}

impl Lifecycle for SalesOrderStatus {
    fn allows(self, _to: Self) -> bool {
        true
    }

    fn as_str(self) -> &'static str {
        SalesOrderStatus::as_str(self)
    }
}

/// Ordered line: product, quantity, unit of measure, unit price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: Option<DocumentId>,
    #[serde(default)]
    pub description: String,
    pub quantity: i64,
    #[serde(default)]
    pub uom: String,
    /// Unit price in minor units, as supplied by the caller.
    pub price: i64,
    /// `quantity × price`.
    pub subtotal: i64,
}

impl LineItem for OrderItem {
    fn quantity(&self) -> i64 {
        self.quantity
    }
    fn price(&self) -> i64 {
        self.price
    }
    fn amount(&self) -> i64 {
        self.subtotal
    }
    fn set_amount(&mut self, amount: i64) {
        self.subtotal = amount;
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemInput {
    pub product_id: Option<DocumentId>,
    #[serde(default)]
    pub description: String,
    pub quantity: i64,
    #[serde(default)]
    pub uom: String,
    pub price: i64,
}

impl From<OrderItemInput> for OrderItem {
    fn from(i: OrderItemInput) -> Self {
        Self {
            product_id: i.product_id,
            description: i.description,
            quantity: i.quantity,
            uom: i.uom,
            price: i.price,
            subtotal: 0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SalesOrderInput {
    pub project_id: DocumentId,
    pub customer_id: DocumentId,
    pub items: Vec<OrderItemInput>,
}

/// Edit payload: both parts are optional and applied together.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SalesOrderUpdate {
    pub items: Option<Vec<OrderItemInput>>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesOrder {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub sales_order_no: String,
    pub project_id: DocumentId,
    pub customer_id: DocumentId,
    pub items: Vec<OrderItem>,
    pub total_amount: i64,
    pub status: SalesOrderStatus,
    pub created_by: Option<DocumentId>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl SalesOrder {
    pub fn create(
        input: SalesOrderInput,
        created_by: Option<DocumentId>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let mut items: Vec<OrderItem> = input.items.into_iter().map(OrderItem::from).collect();
        let total_amount = totals::recompute(&mut items)?;
        Ok(Self {
            id: DocumentId::new(),
            sales_order_no: format!("SO-{}", timestamp::compact(&now)),
            project_id: input.project_id,
            customer_id: input.customer_id,
            items,
            total_amount,
            status: SalesOrderStatus::NotApproved,
            created_by,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply an edit. Items are replaced and the total recomputed from scratch.
    /// An unrecognised status value leaves the status untouched.
    ///
    /// Returns whether anything changed; `updated_at` moves only then.
    pub fn apply_update(&mut self, update: SalesOrderUpdate, now: DateTime<Utc>) -> DomainResult<bool> {
        let mut changed = false;
        if let Some(items) = update.items {
            let mut items: Vec<OrderItem> = items.into_iter().map(OrderItem::from).collect();
            let total = totals::recompute(&mut items)?;
            self.items = items;
            self.total_amount = total;
            changed = true;
        }
        if let Some(raw) = update.status {
            changed |= self.set_status(&raw)?;
        }
        if changed {
            self.updated_at = now;
        }
        Ok(changed)
    }

    /// Returns whether the status actually moved. Unknown values are ignored.
    pub fn set_status(&mut self, raw: &str) -> DomainResult<bool> {
        let Some(to) = SalesOrderStatus::parse(raw) else {
            return Ok(false);
        };
        let t = lifecycle::transition(self.status, to)?;
        if t.is_move() {
            self.status = to;
        }
        Ok(t.is_move())
    }
}

impl Entity for SalesOrder {
    const COLLECTION: &'static str = collections::SALES_ORDER;

    fn id(&self) -> DocumentId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polaris_core::totals::totals_consistent;
    use proptest::prelude::*;

    fn item(qty: i64, price: i64) -> OrderItemInput {
        OrderItemInput {
            product_id: Some(DocumentId::new()),
            description: String::new(),
            quantity: qty,
            uom: "unit".to_string(),
            price,
        }
    }

    fn test_order(items: Vec<OrderItemInput>) -> SalesOrder {
        SalesOrder::create(
            SalesOrderInput {
                project_id: DocumentId::new(),
                customer_id: DocumentId::new(),
                items,
            },
            Some(DocumentId::new()),
            timestamp::now(),
        )
        .unwrap()
    }

    #[test]
    fn create_computes_subtotals_and_total() {
        let order = test_order(vec![item(2, 100), item(1, 50)]);
        assert_eq!(order.total_amount, 250);
        assert_eq!(order.items[0].subtotal, 200);
        assert_eq!(order.status, SalesOrderStatus::NotApproved);
        assert!(order.sales_order_no.starts_with("SO-"));
    }

    #[test]
    fn status_toggles_both_ways_and_is_idempotent() {
        let mut order = test_order(vec![item(1, 10)]);
        assert!(order.set_status("approved").unwrap());
        assert!(!order.set_status("approved").unwrap());
        assert_eq!(order.status, SalesOrderStatus::Approved);
        assert!(order.set_status("notapproved").unwrap());
        assert_eq!(order.status, SalesOrderStatus::NotApproved);
        assert!(!order.set_status("shipped").unwrap());
    }

    #[test]
    fn reapplying_current_status_leaves_order_unchanged() {
        let mut order = test_order(vec![item(1, 10)]);
        let approve = || SalesOrderUpdate { items: None, status: Some("approved".to_string()) };
        assert!(order.apply_update(approve(), timestamp::now()).unwrap());
        let before = order.clone();

        let later = order.updated_at + chrono::Duration::seconds(60);
        assert!(!order.apply_update(approve(), later).unwrap());
        assert_eq!(order, before);
    }

    #[test]
    fn unknown_status_leaves_status_untouched() {
        let mut order = test_order(vec![item(1, 10)]);
        order.set_status("approved").unwrap();
        let before = order.clone();
        let update = SalesOrderUpdate {
            items: None,
            status: Some("shipped".to_string()),
        };
        assert!(!order.apply_update(update, timestamp::now()).unwrap());
        assert_eq!(order, before);
    }

    #[test]
    fn edit_replaces_items_and_recomputes_total() {
        let mut order = test_order(vec![item(2, 100), item(1, 50)]);
        let update = SalesOrderUpdate {
            items: Some(vec![item(3, 30)]),
            status: Some("approved".to_string()),
        };
        order.apply_update(update, timestamp::now()).unwrap();
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.total_amount, 90);
        assert_eq!(order.status, SalesOrderStatus::Approved);
    }

    #[test]
    fn failed_edit_keeps_previous_items() {
        let mut order = test_order(vec![item(2, 100)]);
        let update = SalesOrderUpdate {
            items: Some(vec![item(0, 100)]),
            status: None,
        };
        assert!(order.apply_update(update, timestamp::now()).is_err());
        assert_eq!(order.total_amount, 200);
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_value(SalesOrderStatus::NotApproved).unwrap();
        assert_eq!(json, "notapproved");
    }

    proptest! {
        #[test]
        fn totals_hold_after_create_and_edit(
            first in prop::collection::vec((1i64..500, 0i64..1_000_000), 1..10),
            second in prop::collection::vec((1i64..500, 0i64..1_000_000), 1..10),
        ) {
            let mut order = test_order(first.iter().map(|(q, p)| item(*q, *p)).collect());
            prop_assert!(totals_consistent(&order.items, order.total_amount));
            let update = SalesOrderUpdate {
                items: Some(second.iter().map(|(q, p)| item(*q, *p)).collect()),
                status: None,
            };
            order.apply_update(update, timestamp::now()).unwrap();
            prop_assert!(totals_consistent(&order.items, order.total_amount));
        }
    }
}
