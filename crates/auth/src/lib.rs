//! `polaris-auth`: authentication and user administration boundary.
//!
//! Pure policy and token handling: no HTTP and no storage. The infra crate
//! persists the records defined here and the api crate enforces the checks.

pub mod claims;
pub mod jwt;
pub mod password;
pub mod principal;
pub mod roles;
pub mod user;

pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use jwt::{Hs256JwtValidator, JwtValidator};
pub use principal::Principal;
pub use roles::{Role, RoleRecord};
pub use user::{Decision, PendingStatus, PendingUser, SignupInput, User, UserStatus};
