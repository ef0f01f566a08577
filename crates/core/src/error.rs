//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every variant maps to a stable, caller-visible code (see [`DomainError::code`]).
/// Store and render failures surface as `Internal`; their text is meant for logs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// No (or an invalid) authenticated principal.
    #[error("unauthenticated")]
    Unauthenticated,

    /// Authenticated, but lacking the privilege for the operation.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Malformed input (bad id, missing field, unsupported export type, bad date).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A foreign reference required by a write does not resolve.
    #[error("invalid reference: {0}")]
    InvalidReference(String),

    /// The requested document is absent.
    #[error("not found: {0}")]
    NotFound(String),

    /// A unique key is already taken.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Store or render failure not attributable to caller input.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::PermissionDenied(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn invalid_reference(msg: impl Into<String>) -> Self {
        Self::InvalidReference(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::PermissionDenied(_) => "permission_denied",
            Self::InvalidArgument(_) => "invalid_argument",
            Self::InvalidReference(_) => "invalid_reference",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::Internal(_) => "internal",
        }
    }
}
