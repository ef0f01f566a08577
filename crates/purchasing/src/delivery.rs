use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use polaris_core::{DocumentId, DomainResult, Entity, collections, timestamp, validation::required};

/// One shipped line as printed on the supplier's delivery receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierDrItem {
    pub line_no: u32,
    #[serde(default)]
    pub model: String,
    pub description: String,
    #[serde(default)]
    pub plant: String,
    #[serde(default)]
    pub storage_location: String,
    #[serde(default)]
    pub unit: String,
    pub ship_qty: i64,
    #[serde(default)]
    pub total_cbm: f64,
    #[serde(default)]
    pub total_kgs: f64,
    #[serde(default)]
    pub serial_nos: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SupplierDrInput {
    pub supplier_id: DocumentId,
    pub project_id: DocumentId,
    pub supplier_dr_no: String,
    #[serde(default)]
    pub your_po_no: String,
    pub date: Option<NaiveDate>,
    pub dispatch_date: Option<NaiveDate>,
    #[serde(default)]
    pub ship_to: String,
    #[serde(default)]
    pub reference: String,
    #[serde(default)]
    pub received_by: String,
    pub items: Vec<SupplierDrItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierDeliveryReceipt {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub supplier_id: DocumentId,
    pub project_id: DocumentId,
    pub supplier_dr_no: String,
    #[serde(default)]
    pub your_po_no: String,
    pub date: Option<NaiveDate>,
    pub dispatch_date: Option<NaiveDate>,
    #[serde(default)]
    pub ship_to: String,
    #[serde(default)]
    pub reference: String,
    #[serde(default)]
    pub received_by: String,
    pub items: Vec<SupplierDrItem>,
    pub created_by: Option<DocumentId>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl SupplierDeliveryReceipt {
    pub fn create(
        input: SupplierDrInput,
        created_by: Option<DocumentId>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let mut dr = Self {
            id: DocumentId::new(),
            supplier_id: input.supplier_id,
            project_id: input.project_id,
            supplier_dr_no: String::new(),
            your_po_no: String::new(),
            date: None,
            dispatch_date: None,
            ship_to: String::new(),
            reference: String::new(),
            received_by: String::new(),
            items: Vec::new(),
            created_by,
            created_at: now,
            updated_at: now,
        };
        dr.update(input, now)?;
        Ok(dr)
    }

    /// Lines are renumbered 1..n in the order given.
    pub fn update(&mut self, input: SupplierDrInput, now: DateTime<Utc>) -> DomainResult<()> {
        self.supplier_dr_no = required("supplier_dr_no", &input.supplier_dr_no)?;
        let mut items = input.items;
        for (n, item) in items.iter_mut().enumerate() {
            item.description = required("description", &item.description)?;
            item.line_no = n as u32 + 1;
        }
        self.supplier_id = input.supplier_id;
        self.project_id = input.project_id;
        self.your_po_no = input.your_po_no.trim().to_string();
        self.date = input.date;
        self.dispatch_date = input.dispatch_date;
        self.ship_to = input.ship_to.trim().to_string();
        self.reference = input.reference.trim().to_string();
        self.received_by = input.received_by.trim().to_string();
        self.items = items;
        self.updated_at = now;
        Ok(())
    }
}

impl Entity for SupplierDeliveryReceipt {
    const COLLECTION: &'static str = collections::SUPPLIER_DR;

    fn id(&self) -> DocumentId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(desc: &str) -> SupplierDrItem {
        SupplierDrItem {
            line_no: 0,
            model: "FTKC".into(),
            description: desc.into(),
            plant: String::new(),
            storage_location: String::new(),
            unit: "pc".into(),
            ship_qty: 2,
            total_cbm: 0.4,
            total_kgs: 38.5,
            serial_nos: vec!["SN1".into(), "SN2".into()],
        }
    }

    #[test]
    fn lines_are_renumbered() {
        let dr = SupplierDeliveryReceipt::create(
            SupplierDrInput {
                supplier_id: DocumentId::new(),
                project_id: DocumentId::new(),
                supplier_dr_no: "DR-88".into(),
                your_po_no: "PO-1".into(),
                date: None,
                dispatch_date: None,
                ship_to: String::new(),
                reference: String::new(),
                received_by: "Warehouse".into(),
                items: vec![line("Indoor"), line("Outdoor")],
            },
            None,
            timestamp::now(),
        )
        .unwrap();
        assert_eq!(dr.items.iter().map(|i| i.line_no).collect::<Vec<_>>(), vec![1, 2]);
    }
}
