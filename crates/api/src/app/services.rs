//! Service wiring: one store handle shared by every domain service.

use std::sync::Arc;

use chrono::Duration;

use polaris_auth::{Hs256JwtValidator, JwtClaims, User};
use polaris_core::{DomainError, DomainResult, timestamp};
use polaris_infra::services::Services;
use polaris_infra::store::{DocumentStore, InMemoryDocumentStore};
use polaris_reports::DashboardService;

/// The store handle as seen by handlers; the backend is chosen at startup.
pub type Store = Arc<dyn DocumentStore>;

/// Signs session tokens for signed-in users.
pub struct TokenIssuer {
    jwt: Arc<Hs256JwtValidator>,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(jwt: Arc<Hs256JwtValidator>, ttl: Duration) -> Self {
        Self { jwt, ttl }
    }

    pub fn issue(&self, user: &User) -> DomainResult<String> {
        let claims = JwtClaims::new(user.user_id(), user.email.clone(), vec![user.role.clone()], timestamp::now(), self.ttl);
        self.jwt
            .issue(&claims)
            .map_err(|e| DomainError::internal(format!("token signing failed: {e}")))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

pub struct AppServices {
    pub store: Store,
    pub domain: Services<Store>,
    pub dashboard: DashboardService<Store>,
    pub jwt: Arc<Hs256JwtValidator>,
    pub tokens: TokenIssuer,
}

impl AppServices {
    pub fn new(store: Store, jwt_secret: &str, token_ttl: Duration) -> Self {
        let jwt = Arc::new(Hs256JwtValidator::new(jwt_secret.as_bytes()));
        Self {
            domain: Services::new(store.clone()),
            dashboard: DashboardService::new(store.clone()),
            tokens: TokenIssuer::new(jwt.clone(), token_ttl),
            jwt,
            store,
        }
    }

    /// Everything in process memory; used by tests and the `memory` backend.
    pub fn in_memory(jwt_secret: &str) -> Self {
        Self::new(Arc::new(InMemoryDocumentStore::new()), jwt_secret, Duration::minutes(60))
    }
}
