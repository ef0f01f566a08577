use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use polaris_core::{
    DocumentId, DomainResult, Entity, collections, timestamp,
    validation::{non_negative, required},
};

/// Catalog entry for one aircon SKU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    /// Unique business key.
    pub sku: String,
    #[serde(default)]
    pub barcode: String,
    pub model_number: String,
    pub name: String,
    #[serde(default)]
    pub hp: String,
    #[serde(default)]
    pub aircon_type: String,
    #[serde(default)]
    pub indoor_outdoor: String,
    /// Quantity on hand.
    pub quantity: i64,
    /// Catalog price in minor units.
    pub price: i64,
    pub created_by: Option<DocumentId>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InventoryInput {
    pub sku: String,
    #[serde(default)]
    pub barcode: String,
    pub model_number: String,
    pub name: String,
    #[serde(default)]
    pub hp: String,
    #[serde(default)]
    pub aircon_type: String,
    #[serde(default)]
    pub indoor_outdoor: String,
    pub quantity: i64,
    pub price: i64,
}

impl InventoryItem {
    pub fn create(
        input: InventoryInput,
        created_by: Option<DocumentId>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let mut item = Self {
            id: DocumentId::new(),
            sku: String::new(),
            barcode: String::new(),
            model_number: String::new(),
            name: String::new(),
            hp: String::new(),
            aircon_type: String::new(),
            indoor_outdoor: String::new(),
            quantity: 0,
            price: 0,
            created_by,
            created_at: now,
            updated_at: now,
        };
        item.update(input, now)?;
        Ok(item)
    }

    /// Replace every catalog field. SKU uniqueness is checked by the caller,
    /// which owns the store.
    pub fn update(&mut self, input: InventoryInput, now: DateTime<Utc>) -> DomainResult<()> {
        self.sku = required("sku", &input.sku)?;
        self.model_number = required("model_number", &input.model_number)?;
        self.name = required("name", &input.name)?;
        self.barcode = input.barcode.trim().to_string();
        self.hp = input.hp.trim().to_string();
        self.aircon_type = input.aircon_type.trim().to_string();
        self.indoor_outdoor = input.indoor_outdoor.trim().to_string();
        self.quantity = non_negative("quantity", input.quantity)?;
        self.price = non_negative("price", input.price)?;
        self.updated_at = now;
        Ok(())
    }
}

impl Entity for InventoryItem {
    const COLLECTION: &'static str = collections::INVENTORY;

    fn id(&self) -> DocumentId {
        self.id
    }
}
