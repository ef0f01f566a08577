use chrono::Datelike;

use polaris_core::{DocumentId, DomainResult, Page, PageRequest, timestamp};
use polaris_parties::{Customer, CustomerInput, Project, ProjectInput, Supplier, SupplierInput, customer_code};

use crate::projections::{project_one, project_page, views::ProjectRow};
use crate::repository::Repository;
use crate::store::{DocumentStore, Filter};

#[derive(Clone)]
pub struct CustomerService<S> {
    store: S,
}

impl<S: DocumentStore + Clone> CustomerService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn repo(&self) -> Repository<S, Customer> {
        Repository::new(self.store.clone())
    }

    /// Assigns the next `CUST-{year}-nnnnn` code from the current count.
    pub async fn create(&self, input: CustomerInput) -> DomainResult<Customer> {
        let now = timestamp::now();
        let existing = self.repo().count(&Filter::new()).await?;
        let customer = Customer::create(input, customer_code(now.year(), existing), now)?;
        self.repo().insert(&customer).await?;
        Ok(customer)
    }

    pub async fn update(&self, id: &DocumentId, input: CustomerInput) -> DomainResult<Customer> {
        let mut customer = self.repo().get(id).await?;
        customer.update(input, timestamp::now())?;
        self.repo().save(&customer).await?;
        Ok(customer)
    }

    pub async fn get(&self, id: &DocumentId) -> DomainResult<Customer> {
        self.repo().get(id).await
    }

    pub async fn delete(&self, id: &DocumentId) -> DomainResult<()> {
        self.repo().delete(id).await
    }

    pub async fn list(&self, request: PageRequest) -> DomainResult<Page<Customer>> {
        let (items, total) = self.repo().page(&Filter::new(), request).await?;
        Ok(Page::new(items, request, total))
    }
}

#[derive(Clone)]
pub struct SupplierService<S> {
    store: S,
}

impl<S: DocumentStore + Clone> SupplierService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn repo(&self) -> Repository<S, Supplier> {
        Repository::new(self.store.clone())
    }

    pub async fn create(&self, input: SupplierInput) -> DomainResult<Supplier> {
        let supplier = Supplier::create(input, timestamp::now())?;
        self.repo().insert(&supplier).await?;
        Ok(supplier)
    }

    pub async fn update(&self, id: &DocumentId, input: SupplierInput) -> DomainResult<Supplier> {
        let mut supplier = self.repo().get(id).await?;
        supplier.update(input, timestamp::now())?;
        self.repo().save(&supplier).await?;
        Ok(supplier)
    }

    pub async fn get(&self, id: &DocumentId) -> DomainResult<Supplier> {
        self.repo().get(id).await
    }

    pub async fn delete(&self, id: &DocumentId) -> DomainResult<()> {
        self.repo().delete(id).await
    }

    pub async fn list(&self, request: PageRequest) -> DomainResult<Page<Supplier>> {
        let (items, total) = self.repo().page(&Filter::new(), request).await?;
        Ok(Page::new(items, request, total))
    }
}

#[derive(Clone)]
pub struct ProjectService<S> {
    store: S,
}

impl<S: DocumentStore + Clone> ProjectService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn repo(&self) -> Repository<S, Project> {
        Repository::new(self.store.clone())
    }

    pub async fn create(&self, input: ProjectInput) -> DomainResult<Project> {
        let project = Project::create(input, timestamp::now())?;
        self.repo().insert(&project).await?;
        Ok(project)
    }

    pub async fn update(&self, id: &DocumentId, input: ProjectInput) -> DomainResult<Project> {
        let mut project = self.repo().get(id).await?;
        project.update(input, timestamp::now())?;
        self.repo().save(&project).await?;
        Ok(project)
    }

    pub async fn get(&self, id: &DocumentId) -> DomainResult<ProjectRow> {
        project_one::<S, Project>(&self.store, id).await
    }

    /// Downstream orders and invoices keep their dangling project reference.
    pub async fn delete(&self, id: &DocumentId) -> DomainResult<()> {
        self.repo().delete(id).await
    }

    pub async fn list(&self, request: PageRequest) -> DomainResult<Page<ProjectRow>> {
        project_page::<S, Project>(&self.store, &Filter::new(), request).await
    }
}
