//! Customers, suppliers and the projects that root every downstream document.
//!
//! Pure domain logic: construction, validation and edits. Persistence lives in
//! `polaris-infra`.

pub mod customer;
pub mod project;
pub mod supplier;

pub use customer::{Customer, CustomerInput, customer_code};
pub use project::{Project, ProjectInput};
pub use supplier::{Supplier, SupplierInput};
