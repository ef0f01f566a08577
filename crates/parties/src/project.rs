use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use polaris_core::{DocumentId, DomainResult, Entity, collections, timestamp, validation::required};

/// Root of the document tree: orders, invoices and receipts all point back here.
///
/// Deleting a project does not cascade to those documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub name: String,
    #[serde(default)]
    pub reference_code: String,
    pub customer_id: Option<DocumentId>,
    #[serde(default)]
    pub customer_organization: String,
    #[serde(default)]
    pub notes: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectInput {
    pub name: String,
    #[serde(default)]
    pub reference_code: String,
    pub customer_id: Option<DocumentId>,
    #[serde(default)]
    pub customer_organization: String,
    #[serde(default)]
    pub notes: String,
}

impl Project {
    pub fn create(input: ProjectInput, now: DateTime<Utc>) -> DomainResult<Self> {
        let mut project = Self {
            id: DocumentId::new(),
            name: String::new(),
            reference_code: String::new(),
            customer_id: None,
            customer_organization: String::new(),
            notes: String::new(),
            created_at: now,
            updated_at: now,
        };
        project.update(input, now)?;
        Ok(project)
    }

    pub fn update(&mut self, input: ProjectInput, now: DateTime<Utc>) -> DomainResult<()> {
        self.name = required("name", &input.name)?;
        self.reference_code = input.reference_code.trim().to_string();
        self.customer_id = input.customer_id;
        self.customer_organization = input.customer_organization.trim().to_string();
        self.notes = input.notes;
        self.updated_at = now;
        Ok(())
    }
}

impl Entity for Project {
    const COLLECTION: &'static str = collections::PROJECT;

    fn id(&self) -> DocumentId {
        self.id
    }
}
