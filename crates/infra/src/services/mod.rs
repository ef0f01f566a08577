//! Write services and list/detail reads, one per business area.
//!
//! Services are generic over the store so tests run against
//! [`InMemoryDocumentStore`](crate::store::InMemoryDocumentStore) and the binary
//! against MongoDB with the same code.

pub mod inventory;
pub mod parties;
pub mod purchasing;
pub mod sales;
pub mod users;

pub use inventory::InventoryService;
pub use parties::{CustomerService, ProjectService, SupplierService};
pub use purchasing::PurchasingService;
pub use sales::SalesService;
pub use users::{DecisionOutcome, PendingUserView, SeedAdmin, UserService, UserView};

use crate::fulfillment::FulfillmentService;
use crate::store::DocumentStore;

/// Every service over one shared store handle.
#[derive(Clone)]
pub struct Services<S> {
    pub store: S,
    pub customers: CustomerService<S>,
    pub suppliers: SupplierService<S>,
    pub projects: ProjectService<S>,
    pub inventory: InventoryService<S>,
    pub sales: SalesService<S>,
    pub purchasing: PurchasingService<S>,
    pub users: UserService<S>,
    pub fulfillment: FulfillmentService<S>,
}

impl<S: DocumentStore + Clone> Services<S> {
    pub fn new(store: S) -> Self {
        Self {
            customers: CustomerService::new(store.clone()),
            suppliers: SupplierService::new(store.clone()),
            projects: ProjectService::new(store.clone()),
            inventory: InventoryService::new(store.clone()),
            sales: SalesService::new(store.clone()),
            purchasing: PurchasingService::new(store.clone()),
            users: UserService::new(store.clone()),
            fulfillment: FulfillmentService::new(store.clone()),
            store,
        }
    }
}
