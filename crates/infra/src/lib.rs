//! `polaris-infra`: storage and the services built on it.
//!
//! - [`store`]: the document store seam with in-memory and MongoDB backends
//! - [`repository`]: typed per-collection access
//! - [`projections`]: cross-entity read views
//! - [`services`]: writes and list/detail reads per business area
//! - [`fulfillment`]: order → invoice → receipt progress

pub mod fulfillment;
pub mod projections;
pub mod repository;
pub mod services;
pub mod store;

pub use fulfillment::{FulfillmentService, FulfillmentStage, FulfillmentStatus, NextStep};
pub use projections::{Projection, RefSet, ResolvedRefs, Resolver};
pub use repository::Repository;
pub use services::Services;
pub use store::{DocumentStore, Filter, FindOptions, InMemoryDocumentStore, MongoDocumentStore, Sort, StoreError};
