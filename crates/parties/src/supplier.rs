use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use polaris_core::{DocumentId, DomainResult, Entity, collections, timestamp, validation::required};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub supplier_code: String,
    pub name: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub tin: String,
    #[serde(default)]
    pub location: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SupplierInput {
    pub supplier_code: String,
    pub name: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub tin: String,
    #[serde(default)]
    pub location: String,
}

impl Supplier {
    pub fn create(input: SupplierInput, now: DateTime<Utc>) -> DomainResult<Self> {
        let mut supplier = Self {
            id: DocumentId::new(),
            supplier_code: String::new(),
            name: String::new(),
            organization: String::new(),
            tin: String::new(),
            location: String::new(),
            created_at: now,
            updated_at: now,
        };
        supplier.update(input, now)?;
        Ok(supplier)
    }

    pub fn update(&mut self, input: SupplierInput, now: DateTime<Utc>) -> DomainResult<()> {
        self.supplier_code = required("supplier_code", &input.supplier_code)?;
        self.name = required("name", &input.name)?;
        self.organization = input.organization.trim().to_string();
        self.tin = input.tin.trim().to_string();
        self.location = input.location.trim().to_string();
        self.updated_at = now;
        Ok(())
    }
}

impl Entity for Supplier {
    const COLLECTION: &'static str = collections::SUPPLIER;

    fn id(&self) -> DocumentId {
        self.id
    }
}
