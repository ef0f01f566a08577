//! Small input checks shared by the entity constructors.

use crate::{DomainError, DomainResult};

/// Trimmed, non-empty value or `InvalidArgument("<field> is required")`.
pub fn required(field: &str, value: &str) -> DomainResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::invalid_argument(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

pub fn non_negative(field: &str, value: i64) -> DomainResult<i64> {
    if value < 0 {
        return Err(DomainError::invalid_argument(format!("{field} must not be negative")));
    }
    Ok(value)
}
