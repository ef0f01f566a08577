use polaris_core::{DomainError, DomainResult, UserId};

use crate::{JwtClaims, Role};

/// The authenticated caller of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
    pub email: String,
    pub roles: Vec<Role>,
}

impl Principal {
    pub fn is_superadmin(&self) -> bool {
        self.roles.iter().any(Role::is_superadmin)
    }

    /// Role management and user approval are reserved to superadmins.
    pub fn require_superadmin(&self) -> DomainResult<()> {
        if self.is_superadmin() {
            Ok(())
        } else {
            Err(DomainError::permission_denied("superadmin role required"))
        }
    }
}

impl From<JwtClaims> for Principal {
    fn from(claims: JwtClaims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            roles: claims.roles,
        }
    }
}
