use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use polaris_core::{DocumentId, DomainResult, Entity, collections, timestamp, validation::required};

/// Role name carried in tokens and on user records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub const SUPERADMIN: Role = Role(Cow::Borrowed("superadmin"));
    pub const USER: Role = Role(Cow::Borrowed("user"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_superadmin(&self) -> bool {
        self.as_str() == Self::SUPERADMIN.as_str()
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stored role definition (`role` collection, unique by name).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRecord {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub name: Role,
    #[serde(default)]
    pub description: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl RoleRecord {
    pub fn create(name: &str, description: &str, now: DateTime<Utc>) -> DomainResult<Self> {
        let name = required("name", name)?.to_lowercase();
        Ok(Self {
            id: DocumentId::new(),
            name: Role::new(name),
            description: description.trim().to_string(),
            created_at: now,
            updated_at: now,
        })
    }
}

impl Entity for RoleRecord {
    const COLLECTION: &'static str = collections::ROLE;

    fn id(&self) -> DocumentId {
        self.id
    }
}
