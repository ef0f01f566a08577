use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use polaris_core::{DocumentId, DomainResult, Entity, collections, timestamp, validation::required};

/// Customer master record. Referenced by id from projects, orders and invoices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    /// Business code, `CUST-{year}-{n:05}`.
    pub customer_id: String,
    pub name: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub tin: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerInput {
    pub name: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub tin: String,
}

/// Next customer code given how many customers already exist.
pub fn customer_code(year: i32, existing: u64) -> String {
    format!("CUST-{year}-{:05}", existing + 1)
}

impl Customer {
    pub fn create(input: CustomerInput, code: String, now: DateTime<Utc>) -> DomainResult<Self> {
        Ok(Self {
            id: DocumentId::new(),
            customer_id: code,
            name: required("name", &input.name)?,
            organization: input.organization.trim().to_string(),
            address: input.address.trim().to_string(),
            city: input.city.trim().to_string(),
            tin: input.tin.trim().to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Replace the editable fields. The business code never changes.
    pub fn update(&mut self, input: CustomerInput, now: DateTime<Utc>) -> DomainResult<()> {
        self.name = required("name", &input.name)?;
        self.organization = input.organization.trim().to_string();
        self.address = input.address.trim().to_string();
        self.city = input.city.trim().to_string();
        self.tin = input.tin.trim().to_string();
        self.updated_at = now;
        Ok(())
    }
}

impl Entity for Customer {
    const COLLECTION: &'static str = collections::CUSTOMER;

    fn id(&self) -> DocumentId {
        self.id
    }
}
