//! Users, signup requests and the approval decision.
//!
//! A signup creates a [`PendingUser`]. A superadmin decision either rejects it
//! (terminal) or materialises an active [`User`]; the pending record is kept
//! with its final status for audit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use polaris_core::{
    DocumentId, DomainError, DomainResult, Entity, UserId, collections, timestamp,
    validation::required,
};

use crate::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Suspended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PendingStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignupInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

impl SignupInput {
    /// Trimmed, lowercased email.
    pub fn normalized_email(&self) -> DomainResult<String> {
        normalize_email(&self.email)
    }
}

pub fn normalize_email(raw: &str) -> DomainResult<String> {
    let email = required("email", raw)?.to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(DomainError::invalid_argument("email is not valid")),
    }
}

/// A signup awaiting a superadmin decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingUser {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub status: PendingStatus,
    #[serde(with = "timestamp::option", default)]
    pub processed_at: Option<DateTime<Utc>>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl PendingUser {
    /// `password_hash` must already be a PHC string.
    pub fn create(input: &SignupInput, password_hash: String, now: DateTime<Utc>) -> DomainResult<Self> {
        if input.password.len() < 8 {
            return Err(DomainError::invalid_argument("password must be at least 8 characters"));
        }
        Ok(Self {
            id: DocumentId::new(),
            first_name: required("first_name", &input.first_name)?,
            last_name: required("last_name", &input.last_name)?,
            email: input.normalized_email()?,
            password_hash,
            status: PendingStatus::Pending,
            processed_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    fn close(&mut self, status: PendingStatus, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status != PendingStatus::Pending {
            return Err(DomainError::not_found(format!("pending user {}", self.id)));
        }
        self.status = status;
        self.processed_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    pub fn reject(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        self.close(PendingStatus::Rejected, now)
    }

    /// Marks the record approved and returns the active user it becomes.
    ///
    /// The user gets a fresh id; a later decision against the pending id finds
    /// only the closed record and is `NotFound`.
    pub fn approve(&mut self, role: Role, now: DateTime<Utc>) -> DomainResult<User> {
        self.close(PendingStatus::Approved, now)?;
        Ok(User {
            id: DocumentId::new(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            password_hash: self.password_hash.clone(),
            role,
            status: UserStatus::Active,
            created_at: now,
            updated_at: now,
        })
    }
}

impl Entity for PendingUser {
    const COLLECTION: &'static str = collections::PENDING_USER;

    fn id(&self) -> DocumentId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    #[serde(default)]
    pub status: UserStatus,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Directly provisioned user (startup seeding).
    pub fn provision(email: &str, password_hash: String, role: Role, now: DateTime<Utc>) -> DomainResult<Self> {
        Ok(Self {
            id: DocumentId::new(),
            first_name: String::new(),
            last_name: String::new(),
            email: normalize_email(email)?,
            password_hash,
            role,
            status: UserStatus::Active,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn user_id(&self) -> UserId {
        UserId::from(self.id)
    }

    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }

    pub fn suspend(&mut self, now: DateTime<Utc>) {
        self.status = UserStatus::Suspended;
        self.updated_at = now;
    }

    pub fn grant(&mut self, role: Role, now: DateTime<Utc>) {
        self.role = role;
        self.status = UserStatus::Active;
        self.updated_at = now;
    }
}

impl Entity for User {
    const COLLECTION: &'static str = collections::USER;

    fn id(&self) -> DocumentId {
        self.id
    }
}

/// Superadmin decision about a user or a pending signup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Deactivate,
    Reject,
    Grant(Role),
}

impl Decision {
    /// `deactivate` and `reject` are recognised; any other action grants
    /// `role` (default `user`).
    pub fn parse(action: &str, role: Option<&str>) -> Self {
        match action.trim().to_ascii_lowercase().as_str() {
            "deactivate" => Decision::Deactivate,
            "reject" => Decision::Reject,
            _ => {
                let role = role
                    .map(str::trim)
                    .filter(|r| !r.is_empty())
                    .map(|r| Role::new(r.to_lowercase()))
                    .unwrap_or(Role::USER);
                Decision::Grant(role)
            }
        }
    }

    /// Apply to an existing user. Only `Deactivate` suspends. `Reject` only
    /// applies to signups; against a user it is treated like any other
    /// non-deactivate action and re-activates the account with role `user`.
    pub fn apply_to_user(self, user: &mut User, now: DateTime<Utc>) {
        match self {
            Decision::Deactivate => user.suspend(now),
            Decision::Reject => user.grant(Role::USER, now),
            Decision::Grant(role) => user.grant(role, now),
        }
    }

    /// Apply to a pending signup. Returns the user to persist on approval.
    /// Only `Reject` refuses; `Deactivate` approves with role `user`.
    pub fn apply_to_pending(self, pending: &mut PendingUser, now: DateTime<Utc>) -> DomainResult<Option<User>> {
        match self {
            Decision::Reject => pending.reject(now).map(|_| None),
            Decision::Deactivate => pending.approve(Role::USER, now).map(Some),
            Decision::Grant(role) => pending.approve(role, now).map(Some),
        }
    }
}
