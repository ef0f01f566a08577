use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use polaris_core::{
    DocumentId, DomainError, DomainResult, Entity, LineItem, Lifecycle, collections, lifecycle,
    timestamp, totals,
    validation::required,
};

/// Supplier purchase order status: `draft -> approved -> sent -> closed`.
///
/// Monotonic and one step at a time; the approval step is where the approver
/// is recorded, so it cannot be skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoStatus {
    Draft,
    Approved,
    Sent,
    Closed,
}

impl PoStatus {
    pub fn parse(raw: &str) -> DomainResult<Self> {
        match raw.trim() {
            "draft" => Ok(Self::Draft),
            "approved" => Ok(Self::Approved),
            "sent" => Ok(Self::Sent),
            "closed" => Ok(Self::Closed),
            _ => Err(DomainError::invalid_argument(format!("unknown purchase order status '{raw}'"))),
        }
    }

    fn next(self) -> Option<Self> {
        match self {
            Self::Draft => Some(Self::Approved),
            Self::Approved => Some(Self::Sent),
            Self::Sent => Some(Self::Closed),
            Self::Closed => None,
        }
    }
}

impl Lifecycle for PoStatus {
    fn allows(self, to: Self) -> bool {
        self.next() == Some(to)
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Approved => "approved",
            Self::Sent => "sent",
            Self::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoItem {
    pub description: String,
    pub quantity: i64,
    #[serde(default)]
    pub uom: String,
    /// Caller-supplied rate per unit, minor units.
    pub rate: i64,
    pub amount: i64,
}

impl LineItem for PoItem {
    fn quantity(&self) -> i64 {
        self.quantity
    }
    fn price(&self) -> i64 {
        self.rate
    }
    fn amount(&self) -> i64 {
        self.amount
    }
    fn set_amount(&mut self, amount: i64) {
        self.amount = amount;
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PoItemInput {
    pub description: String,
    pub quantity: i64,
    #[serde(default)]
    pub uom: String,
    pub rate: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SupplierPoInput {
    pub project_id: DocumentId,
    pub supplier_id: DocumentId,
    pub sales_order_id: Option<DocumentId>,
    #[serde(default)]
    pub customer_po_ids: Vec<String>,
    pub items: Vec<PoItemInput>,
}

/// Items and status travel in one update and are applied together.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SupplierPoUpdate {
    pub items: Option<Vec<PoItemInput>>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierPo {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub po_no: String,
    pub project_id: DocumentId,
    pub supplier_id: DocumentId,
    pub sales_order_id: Option<DocumentId>,
    #[serde(default)]
    pub customer_po_ids: Vec<String>,
    pub items: Vec<PoItem>,
    pub total_amount: i64,
    pub status: PoStatus,
    pub approved_by: Option<DocumentId>,
    #[serde(default, with = "timestamp::option")]
    pub approved_at: Option<DateTime<Utc>>,
    pub created_by: Option<DocumentId>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

fn build_items(items: Vec<PoItemInput>) -> DomainResult<(Vec<PoItem>, i64)> {
    let mut items = items
        .into_iter()
        .map(|i| {
            Ok(PoItem {
                description: required("description", &i.description)?,
                quantity: i.quantity,
                uom: i.uom.trim().to_string(),
                rate: i.rate,
                amount: 0,
            })
        })
        .collect::<DomainResult<Vec<_>>>()?;
    let total = totals::recompute(&mut items)?;
    Ok((items, total))
}

impl SupplierPo {
    pub fn create(
        input: SupplierPoInput,
        created_by: Option<DocumentId>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let (items, total_amount) = build_items(input.items)?;
        Ok(Self {
            id: DocumentId::new(),
            po_no: format!("PO-{}", timestamp::compact(&now)),
            project_id: input.project_id,
            supplier_id: input.supplier_id,
            sales_order_id: input.sales_order_id,
            customer_po_ids: input.customer_po_ids,
            items,
            total_amount,
            status: PoStatus::Draft,
            approved_by: None,
            approved_at: None,
            created_by,
            created_at: now,
            updated_at: now,
        })
    }

    /// Validate the whole update first, then apply it; a rejected status move
    /// leaves the items untouched too. Returns whether anything changed.
    pub fn apply_update(
        &mut self,
        update: SupplierPoUpdate,
        actor: DocumentId,
        now: DateTime<Utc>,
    ) -> DomainResult<bool> {
        let items = update.items.map(build_items).transpose()?;
        let status_move = match update.status.as_deref() {
            Some(raw) => {
                let to = PoStatus::parse(raw)?;
                Some((to, lifecycle::transition(self.status, to)?))
            }
            None => None,
        };

        let mut changed = false;
        if let Some((items, total)) = items {
            self.items = items;
            self.total_amount = total;
            changed = true;
        }
        if let Some((to, t)) = status_move {
            if t.is_move() {
                self.status = to;
                if to == PoStatus::Approved {
                    self.approved_by = Some(actor);
                    self.approved_at = Some(now);
                }
                changed = true;
            }
        }
        if changed {
            self.updated_at = now;
        }
        Ok(changed)
    }
}

impl Entity for SupplierPo {
    const COLLECTION: &'static str = collections::SUPPLIER_PO;

    fn id(&self) -> DocumentId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polaris_core::totals::totals_consistent;
    use proptest::prelude::*;

    fn item(qty: i64, rate: i64) -> PoItemInput {
        PoItemInput {
            description: "Outdoor unit".into(),
            quantity: qty,
            uom: "pc".into(),
            rate,
        }
    }

    fn test_po() -> SupplierPo {
        SupplierPo::create(
            SupplierPoInput {
                project_id: DocumentId::new(),
                supplier_id: DocumentId::new(),
                sales_order_id: None,
                customer_po_ids: vec![],
                items: vec![item(2, 1_000)],
            },
            None,
            timestamp::now(),
        )
        .unwrap()
    }

    fn status(raw: &str) -> SupplierPoUpdate {
        SupplierPoUpdate {
            items: None,
            status: Some(raw.to_string()),
        }
    }

    #[test]
    fn new_po_is_draft_with_total() {
        let po = test_po();
        assert_eq!(po.status, PoStatus::Draft);
        assert_eq!(po.total_amount, 2_000);
        assert!(po.po_no.starts_with("PO-"));
    }

    #[test]
    fn approval_stamps_approver_once() {
        let mut po = test_po();
        let approver = DocumentId::new();
        po.apply_update(status("approved"), approver, timestamp::now()).unwrap();
        let stamped_at = po.approved_at;
        assert_eq!(po.approved_by, Some(approver));

        let before = po.clone();
        let later = po.updated_at + chrono::Duration::seconds(60);
        assert!(!po.apply_update(status("approved"), DocumentId::new(), later).unwrap());
        assert_eq!(po.approved_by, Some(approver));
        assert_eq!(po.approved_at, stamped_at);
        assert_eq!(po, before);
    }

    #[test]
    fn full_lifecycle_is_monotonic() {
        let mut po = test_po();
        let actor = DocumentId::new();
        for s in ["approved", "sent", "closed"] {
            po.apply_update(status(s), actor, timestamp::now()).unwrap();
        }
        assert_eq!(po.status, PoStatus::Closed);
        po.apply_update(status("closed"), actor, timestamp::now()).unwrap();
        assert!(matches!(
            po.apply_update(status("sent"), actor, timestamp::now()),
            Err(DomainError::InvalidArgument(_))
        ));
    }

    #[test]
    fn skipping_approval_is_rejected_without_touching_items() {
        let mut po = test_po();
        let update = SupplierPoUpdate {
            items: Some(vec![item(5, 10)]),
            status: Some("sent".into()),
        };
        assert!(po.apply_update(update, DocumentId::new(), timestamp::now()).is_err());
        assert_eq!(po.total_amount, 2_000);
        assert_eq!(po.status, PoStatus::Draft);
    }

    #[test]
    fn items_and_status_change_together() {
        let mut po = test_po();
        let update = SupplierPoUpdate {
            items: Some(vec![item(3, 500), item(1, 250)]),
            status: Some("approved".into()),
        };
        po.apply_update(update, DocumentId::new(), timestamp::now()).unwrap();
        assert_eq!(po.total_amount, 1_750);
        assert_eq!(po.status, PoStatus::Approved);
    }

    #[test]
    fn unknown_status_is_invalid_argument() {
        let mut po = test_po();
        assert!(matches!(
            po.apply_update(status("shipped"), DocumentId::new(), timestamp::now()),
            Err(DomainError::InvalidArgument(_))
        ));
    }

    proptest! {
        #[test]
        fn status_never_moves_backwards(targets in prop::collection::vec(0usize..4, 1..12)) {
            let all = [PoStatus::Draft, PoStatus::Approved, PoStatus::Sent, PoStatus::Closed];
            let mut po = test_po();
            let mut last = po.status;
            for t in targets {
                let _ = po.apply_update(status(all[t].as_str()), DocumentId::new(), timestamp::now());
                prop_assert!(po.status >= last);
                last = po.status;
            }
        }

        #[test]
        fn edited_items_keep_totals_consistent(
            lines in prop::collection::vec((1i64..100, 0i64..100_000), 1..8)
        ) {
            let mut po = test_po();
            let update = SupplierPoUpdate {
                items: Some(lines.iter().map(|(q, r)| item(*q, *r)).collect()),
                status: None,
            };
            po.apply_update(update, DocumentId::new(), timestamp::now()).unwrap();
            prop_assert!(totals_consistent(&po.items, po.total_amount));
        }
    }
}
