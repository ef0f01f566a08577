use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use polaris_core::{
    DocumentId, DomainError, DomainResult, Entity, LineItem, Lifecycle, Transition, collections,
    lifecycle, timestamp, totals,
};

/// `pending <-> approved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuotationStatus {
    Pending,
    Approved,
}

impl QuotationStatus {
    pub fn parse(raw: &str) -> DomainResult<Self> {
        match raw.trim() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            _ => Err(DomainError::invalid_argument(format!("unknown quotation status '{raw}'"))),
        }
    }
}

impl Lifecycle for QuotationStatus {
    fn allows(self, _to: Self) -> bool {
        true
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotationItem {
    pub description: String,
    pub quantity: i64,
    pub rate: i64,
    pub amount: i64,
}

impl LineItem for QuotationItem {
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
pub struct QuotationItemInput {
    pub description: String,
    pub quantity: i64,
    pub rate: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuotationInput {
    pub project_id: Option<DocumentId>,
    pub customer_id: Option<DocumentId>,
    pub items: Vec<QuotationItemInput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quotation {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub quotation_no: String,
    pub project_id: Option<DocumentId>,
    pub customer_id: Option<DocumentId>,
    pub items: Vec<QuotationItem>,
    pub total_amount: i64,
    pub status: QuotationStatus,
    pub approved_by: Option<DocumentId>,
    #[serde(default, with = "timestamp::option")]
    pub approved_at: Option<DateTime<Utc>>,
    pub created_by: Option<DocumentId>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

fn build_items(items: Vec<QuotationItemInput>) -> DomainResult<(Vec<QuotationItem>, i64)> {
    let mut items: Vec<QuotationItem> = items
        .into_iter()
        .map(|i| QuotationItem {
            description: i.description.trim().to_string(),
            quantity: i.quantity,
            rate: i.rate,
            amount: 0,
        })
        .collect();
    let total = totals::recompute(&mut items)?;
    Ok((items, total))
}

impl Quotation {
    pub fn create(
        input: QuotationInput,
        created_by: Option<DocumentId>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let (items, total_amount) = build_items(input.items)?;
        Ok(Self {
            id: DocumentId::new(),
            quotation_no: format!("QT-{}", timestamp::compact(&now)),
            project_id: input.project_id,
            customer_id: input.customer_id,
            items,
            total_amount,
            status: QuotationStatus::Pending,
            approved_by: None,
            approved_at: None,
            created_by,
            created_at: now,
            updated_at: now,
        })
    }

    fn ensure_pending(&self, action: &str) -> DomainResult<()> {
        if self.status != QuotationStatus::Pending {
            return Err(DomainError::invalid_argument(format!(
                "only pending quotations can be {action}"
            )));
        }
        Ok(())
    }

    pub fn revise(&mut self, items: Vec<QuotationItemInput>, now: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_pending("edited")?;
        let (items, total) = build_items(items)?;
        self.items = items;
        self.total_amount = total;
        self.updated_at = now;
        Ok(())
    }

    pub fn ensure_deletable(&self) -> DomainResult<()> {
        self.ensure_pending("deleted")
    }

    /// Approval stamps the approver; moving back to pending clears the stamp.
    pub fn set_status(
        &mut self,
        to: QuotationStatus,
        actor: DocumentId,
        now: DateTime<Utc>,
    ) -> DomainResult<Transition<QuotationStatus>> {
        let t = lifecycle::transition(self.status, to)?;
        if t.is_move() {
            self.status = to;
            match to {
                QuotationStatus::Approved => {
                    self.approved_by = Some(actor);
                    self.approved_at = Some(now);
                }
                QuotationStatus::Pending => {
                    self.approved_by = None;
                    self.approved_at = None;
                }
            }
            self.updated_at = now;
        }
        Ok(t)
    }
}

impl Entity for Quotation {
    const COLLECTION: &'static str = collections::QUOTATION;

    fn id(&self) -> DocumentId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_quotation() -> Quotation {
        Quotation::create(
            QuotationInput {
                project_id: None,
                customer_id: Some(DocumentId::new()),
                items: vec![
                    QuotationItemInput {
                        description: "Installation".into(),
                        quantity: 2,
                        rate: 1_500,
                    },
                    QuotationItemInput {
                        description: "Copper pipe".into(),
                        quantity: 10,
                        rate: 200,
                    },
                ],
            },
            None,
            timestamp::now(),
        )
        .unwrap()
    }

    #[test]
    fn total_is_sum_of_amounts() {
        let q = test_quotation();
        assert_eq!(q.total_amount, 5_000);
        assert_eq!(q.status, QuotationStatus::Pending);
    }

    #[test]
    fn approve_stamps_and_revert_clears() {
        let mut q = test_quotation();
        let approver = DocumentId::new();
        q.set_status(QuotationStatus::Approved, approver, timestamp::now()).unwrap();
        assert_eq!(q.approved_by, Some(approver));
        assert!(q.approved_at.is_some());

        let again = q.set_status(QuotationStatus::Approved, DocumentId::new(), timestamp::now()).unwrap();
        assert_eq!(again, Transition::Unchanged);
        assert_eq!(q.approved_by, Some(approver));

        q.set_status(QuotationStatus::Pending, approver, timestamp::now()).unwrap();
        assert_eq!(q.approved_by, None);
        assert_eq!(q.approved_at, None);
    }

    #[test]
    fn approved_quotation_is_frozen() {
        let mut q = test_quotation();
        q.set_status(QuotationStatus::Approved, DocumentId::new(), timestamp::now()).unwrap();
        let err = q
            .revise(
                vec![QuotationItemInput {
                    description: "x".into(),
                    quantity: 1,
                    rate: 1,
                }],
                timestamp::now(),
            )
            .unwrap_err();
        assert_eq!(err, DomainError::invalid_argument("only pending quotations can be edited"));
        assert!(q.ensure_deletable().is_err());
    }
}
