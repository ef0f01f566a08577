//! Signup, signin and superadmin user administration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use polaris_auth::password::{hash_password, verify_password};
use polaris_auth::user::normalize_email;
use polaris_auth::{
    Decision, PendingStatus, PendingUser, Principal, Role, RoleRecord, SignupInput, User, UserStatus,
};
use polaris_core::{DocumentId, DomainError, DomainResult, Page, PageRequest, timestamp};

use crate::repository::Repository;
use crate::store::{DocumentStore, Filter, FindOptions, Sort};

/// A user as shown to administrators (no password hash).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserView {
    pub id: DocumentId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub status: UserStatus,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserView {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            first_name: u.first_name,
            last_name: u.last_name,
            email: u.email,
            role: u.role,
            status: u.status,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingUserView {
    pub id: DocumentId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub status: PendingStatus,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl From<PendingUser> for PendingUserView {
    fn from(p: PendingUser) -> Self {
        Self {
            id: p.id,
            first_name: p.first_name,
            last_name: p.last_name,
            email: p.email,
            status: p.status,
            created_at: p.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DecisionOutcome {
    UserUpdated { user: UserView },
    SignupApproved { user: UserView },
    SignupRejected { pending: PendingUserView },
}

/// Super admin account ensured at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedAdmin {
    pub email: String,
    pub password: String,
}

#[derive(Clone)]
pub struct UserService<S> {
    store: S,
}

impl<S: DocumentStore + Clone> UserService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn users(&self) -> Repository<S, User> {
        Repository::new(self.store.clone())
    }

    fn pending(&self) -> Repository<S, PendingUser> {
        Repository::new(self.store.clone())
    }

    fn roles(&self) -> Repository<S, RoleRecord> {
        Repository::new(self.store.clone())
    }

    async fn user_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        self.users().find_one(&Filter::new().eq("email", email)).await
    }

    /// Email must be free among users and open signups.
    pub async fn signup(&self, input: SignupInput) -> DomainResult<PendingUserView> {
        let email = input.normalized_email()?;
        let open = Filter::new().eq("email", email.as_str()).eq("status", "pending");
        if self.user_by_email(&email).await?.is_some() || self.pending().count(&open).await? > 0 {
            return Err(DomainError::conflict(format!("{email} is already registered")));
        }
        let pending = PendingUser::create(&input, hash_password(&input.password)?, timestamp::now())?;
        self.pending().insert(&pending).await?;
        Ok(pending.into())
    }

    /// Unknown emails, wrong passwords and inactive accounts all fail the same way.
    pub async fn signin(&self, email: &str, password: &str) -> DomainResult<User> {
        let email = normalize_email(email).map_err(|_| DomainError::Unauthenticated)?;
        match self.user_by_email(&email).await? {
            Some(user) if user.is_active() && verify_password(password, &user.password_hash) => Ok(user),
            Some(user) if !user.is_active() => {
                tracing::info!(user_id = %user.id, "signin refused for suspended user");
                Err(DomainError::Unauthenticated)
            }
            _ => Err(DomainError::Unauthenticated),
        }
    }

    /// Apply a superadmin decision to a user or, failing that, to an open signup.
    pub async fn decide(
        &self,
        actor: &Principal,
        target: &DocumentId,
        action: &str,
        role: Option<&str>,
    ) -> DomainResult<DecisionOutcome> {
        actor.require_superadmin()?;
        if DocumentId::from(actor.user_id) == *target {
            return Err(DomainError::permission_denied("cannot decide on your own account"));
        }
        let decision = Decision::parse(action, role);
        let now = timestamp::now();

        match self.users().get(target).await {
            Ok(mut user) => {
                decision.apply_to_user(&mut user, now);
                self.users().save(&user).await?;
                tracing::info!(user_id = %user.id, status = ?user.status, "user updated by superadmin");
                return Ok(DecisionOutcome::UserUpdated { user: user.into() });
            }
            Err(DomainError::NotFound(_)) => {}
            Err(e) => return Err(e),
        }

        let mut pending = match self.pending().get(target).await {
            Ok(p) => p,
            Err(DomainError::NotFound(_)) => {
                return Err(DomainError::not_found(format!("pending user {target}")));
            }
            Err(e) => return Err(e),
        };
        let created = decision.apply_to_pending(&mut pending, now)?;
        if let Some(user) = &created {
            self.users().insert(user).await?;
        }
        self.pending().save(&pending).await?;

        Ok(match created {
            Some(user) => DecisionOutcome::SignupApproved { user: user.into() },
            None => DecisionOutcome::SignupRejected { pending: pending.into() },
        })
    }

    pub async fn list_users(&self, actor: &Principal, request: PageRequest) -> DomainResult<Page<UserView>> {
        actor.require_superadmin()?;
        let (items, total) = self.users().page(&Filter::new(), request).await?;
        Ok(Page::new(items, request, total).map(UserView::from))
    }

    pub async fn list_pending(&self, actor: &Principal, request: PageRequest) -> DomainResult<Page<PendingUserView>> {
        actor.require_superadmin()?;
        let filter = Filter::new().eq("status", "pending");
        let (items, total) = self.pending().page(&filter, request).await?;
        Ok(Page::new(items, request, total).map(PendingUserView::from))
    }

    pub async fn create_role(&self, actor: &Principal, name: &str, description: &str) -> DomainResult<RoleRecord> {
        actor.require_superadmin()?;
        let record = RoleRecord::create(name, description, timestamp::now())?;
        let taken = Filter::new().eq("name", record.name.as_str());
        if self.roles().count(&taken).await? > 0 {
            return Err(DomainError::conflict(format!("role {} already exists", record.name)));
        }
        self.roles().insert(&record).await?;
        Ok(record)
    }

    pub async fn list_roles(&self, actor: &Principal) -> DomainResult<Vec<RoleRecord>> {
        actor.require_superadmin()?;
        self.roles().find(&Filter::new(), FindOptions::sorted(Sort::asc("name"))).await
    }

    /// Ensure the superadmin role and every configured super admin exist.
    pub async fn seed(&self, admins: &[SeedAdmin]) -> DomainResult<()> {
        let now = timestamp::now();
        let role_filter = Filter::new().eq("name", Role::SUPERADMIN.as_str());
        if self.roles().count(&role_filter).await? == 0 {
            let record = RoleRecord::create(Role::SUPERADMIN.as_str(), "full administrative access", now)?;
            self.roles().insert(&record).await?;
            tracing::info!("seeded superadmin role");
        }

        for admin in admins {
            let email = normalize_email(&admin.email)?;
            match self.user_by_email(&email).await? {
                Some(user) if user.is_active() && user.role.is_superadmin() => {}
                Some(mut user) => {
                    user.grant(Role::SUPERADMIN, now);
                    self.users().save(&user).await?;
                    tracing::info!(email = %email, "promoted existing user to superadmin");
                }
                None => {
                    let user = User::provision(&email, hash_password(&admin.password)?, Role::SUPERADMIN, now)?;
                    self.users().insert(&user).await?;
                    tracing::info!(email = %email, "seeded superadmin user");
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use polaris_core::UserId;

    use super::*;
    use crate::store::InMemoryDocumentStore;

    fn signup(email: &str) -> SignupInput {
        SignupInput {
            first_name: "Lia".into(),
            last_name: "Santos".into(),
            email: email.into(),
            password: "hunter2hunter2".into(),
        }
    }

    fn admin() -> Principal {
        Principal { user_id: UserId::new(), email: "root@polaris.test".into(), roles: vec![Role::SUPERADMIN] }
    }

    #[tokio::test]
    async fn approve_twice_is_not_found() {
        let svc = UserService::new(Arc::new(InMemoryDocumentStore::new()));
        let pending = svc.signup(signup("lia@polaris.test")).await.unwrap();

        let first = svc.decide(&admin(), &pending.id, "approve", None).await.unwrap();
        let DecisionOutcome::SignupApproved { user } = first else {
            panic!("expected approval");
        };
        assert_eq!(user.status, UserStatus::Active);
        assert_eq!(user.role, Role::USER);

        let second = svc.decide(&admin(), &pending.id, "approve", None).await;
        assert!(matches!(second, Err(DomainError::NotFound(_))));

        let signed_in = svc.signin("LIA@polaris.test", "hunter2hunter2").await.unwrap();
        assert_eq!(signed_in.id, user.id);
    }

    #[tokio::test]
    async fn duplicate_signup_is_conflict() {
        let svc = UserService::new(Arc::new(InMemoryDocumentStore::new()));
        svc.signup(signup("lia@polaris.test")).await.unwrap();
        let err = svc.signup(signup("lia@polaris.test")).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn pending_and_wrong_password_cannot_sign_in() {
        let svc = UserService::new(Arc::new(InMemoryDocumentStore::new()));
        svc.signup(signup("lia@polaris.test")).await.unwrap();
        assert_eq!(svc.signin("lia@polaris.test", "hunter2hunter2").await, Err(DomainError::Unauthenticated));

        svc.seed(&[SeedAdmin { email: "root@polaris.test".into(), password: "rootroot".into() }])
            .await
            .unwrap();
        assert!(svc.signin("root@polaris.test", "rootroot").await.is_ok());
        assert_eq!(svc.signin("root@polaris.test", "nope").await, Err(DomainError::Unauthenticated));
    }

    #[tokio::test]
    async fn decisions_need_a_superadmin_acting_on_someone_else() {
        let svc = UserService::new(Arc::new(InMemoryDocumentStore::new()));
        let pending = svc.signup(signup("lia@polaris.test")).await.unwrap();
        let plain = Principal { roles: vec![Role::USER], ..admin() };
        assert!(matches!(
            svc.decide(&plain, &pending.id, "approve", None).await,
            Err(DomainError::PermissionDenied(_))
        ));

        let me = admin();
        let own = DocumentId::from(me.user_id);
        assert!(matches!(svc.decide(&me, &own, "deactivate", None).await, Err(DomainError::PermissionDenied(_))));
    }

    #[tokio::test]
    async fn seeding_is_idempotent_and_roles_are_unique() {
        let svc = UserService::new(Arc::new(InMemoryDocumentStore::new()));
        let admins = [SeedAdmin { email: "root@polaris.test".into(), password: "rootroot".into() }];
        svc.seed(&admins).await.unwrap();
        svc.seed(&admins).await.unwrap();
        assert_eq!(svc.list_users(&admin(), PageRequest::default()).await.unwrap().total, 1);
        assert_eq!(svc.list_roles(&admin()).await.unwrap().len(), 1);

        svc.create_role(&admin(), "Accounting", "").await.unwrap();
        let dup = svc.create_role(&admin(), "accounting", "").await;
        assert!(matches!(dup, Err(DomainError::Conflict(_))));
    }
}
