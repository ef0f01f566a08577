//! `polaris-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, the error taxonomy, page windows, persisted time formats and the
//! line-item total calculator shared by every order-like document.

pub mod date_range;
pub mod entity;
pub mod error;
pub mod id;
pub mod lifecycle;
pub mod pagination;
pub mod timestamp;
pub mod totals;
pub mod validation;

pub use date_range::DateRange;
pub use entity::{Entity, collections};
pub use error::{DomainError, DomainResult};
pub use id::{DocumentId, UserId};
pub use lifecycle::{Lifecycle, Transition};
pub use pagination::{Page, PageQuery, PageRequest};
pub use totals::{CatalogLine, LineItem, PriceCatalog};
