use polaris_core::{DocumentId, DomainResult, Page, PageRequest, Transition, timestamp};
use polaris_parties::Customer;
use polaris_sales::{
    DeliveryReceipt, DeliveryStatus, InvoiceItemInput, Quotation, QuotationInput, QuotationItemInput,
    QuotationStatus, SalesInvoice, SalesInvoiceInput, SalesOrder, SalesOrderInput, SalesOrderUpdate, requested_skus,
};

use crate::projections::views::{DeliveryReceiptRow, QuotationRow, SalesInvoiceRow, SalesOrderRow};
use crate::projections::{project_one, project_page};
use crate::repository::Repository;
use crate::services::InventoryService;
use crate::store::{DocumentStore, Filter, id_value};

/// Sales orders, sales invoices, delivery receipts and quotations.
#[derive(Clone)]
pub struct SalesService<S> {
    store: S,
    inventory: InventoryService<S>,
}

impl<S: DocumentStore + Clone> SalesService<S> {
    pub fn new(store: S) -> Self {
        Self { inventory: InventoryService::new(store.clone()), store }
    }

    fn orders(&self) -> Repository<S, SalesOrder> {
        Repository::new(self.store.clone())
    }

    fn invoices(&self) -> Repository<S, SalesInvoice> {
        Repository::new(self.store.clone())
    }

    fn receipts(&self) -> Repository<S, DeliveryReceipt> {
        Repository::new(self.store.clone())
    }

    fn quotations(&self) -> Repository<S, Quotation> {
        Repository::new(self.store.clone())
    }

    // Sales orders

    pub async fn create_order(&self, input: SalesOrderInput, actor: DocumentId) -> DomainResult<SalesOrder> {
        let order = SalesOrder::create(input, Some(actor), timestamp::now())?;
        self.orders().insert(&order).await?;
        Ok(order)
    }

    pub async fn update_order(&self, id: &DocumentId, update: SalesOrderUpdate) -> DomainResult<SalesOrder> {
        let mut order = self.orders().get(id).await?;
        if order.apply_update(update, timestamp::now())? {
            self.orders().save(&order).await?;
        }
        Ok(order)
    }

    pub async fn get_order(&self, id: &DocumentId) -> DomainResult<SalesOrderRow> {
        project_one::<S, SalesOrder>(&self.store, id).await
    }

    pub async fn delete_order(&self, id: &DocumentId) -> DomainResult<()> {
        self.orders().delete(id).await
    }

    pub async fn list_orders(&self, request: PageRequest) -> DomainResult<Page<SalesOrderRow>> {
        project_page::<S, SalesOrder>(&self.store, &Filter::new(), request).await
    }

    // Sales invoices

    /// Prices come from the catalog at this instant; one catalog query per write.
    /// An unknown SKU fails before anything is stored.
    pub async fn create_invoice(&self, input: SalesInvoiceInput, actor: DocumentId) -> DomainResult<SalesInvoice> {
        let catalog = self.inventory.catalog(&requested_skus(&input.items)).await?;
        let invoice = SalesInvoice::create(input, &catalog, Some(actor), timestamp::now())?;
        self.invoices().insert(&invoice).await?;
        Ok(invoice)
    }

    /// Re-prices every line from the current catalog.
    pub async fn revise_invoice(&self, id: &DocumentId, items: Vec<InvoiceItemInput>) -> DomainResult<SalesInvoice> {
        let mut invoice = self.invoices().get(id).await?;
        let catalog = self.inventory.catalog(&requested_skus(&items)).await?;
        invoice.revise(items, &catalog, timestamp::now())?;
        self.invoices().save(&invoice).await?;
        Ok(invoice)
    }

    pub async fn get_invoice(&self, id: &DocumentId) -> DomainResult<SalesInvoiceRow> {
        project_one::<S, SalesInvoice>(&self.store, id).await
    }

    pub async fn delete_invoice(&self, id: &DocumentId) -> DomainResult<()> {
        self.invoices().delete(id).await
    }

    pub async fn list_invoices(&self, request: PageRequest) -> DomainResult<Page<SalesInvoiceRow>> {
        project_page::<S, SalesInvoice>(&self.store, &Filter::new(), request).await
    }

    pub async fn list_invoices_by_project(
        &self,
        project_id: &DocumentId,
        request: PageRequest,
    ) -> DomainResult<Page<SalesInvoiceRow>> {
        let filter = Filter::new().eq("project_id", id_value(project_id));
        project_page::<S, SalesInvoice>(&self.store, &filter, request).await
    }

    // Delivery receipts

    /// The source invoice and its customer must both exist.
    pub async fn create_delivery_receipt(
        &self,
        sales_invoice_id: &DocumentId,
        actor: DocumentId,
    ) -> DomainResult<DeliveryReceipt> {
        let invoice = self.invoices().get_reference(sales_invoice_id).await?;
        let customer = Repository::<S, Customer>::new(self.store.clone())
            .get_reference(&invoice.customer_id)
            .await?;
        let receipt = DeliveryReceipt::from_invoice(&invoice, &customer, Some(actor), timestamp::now())?;
        self.receipts().insert(&receipt).await?;
        Ok(receipt)
    }

    pub async fn set_delivery_status(&self, id: &DocumentId, raw: &str) -> DomainResult<DeliveryReceipt> {
        let to = DeliveryStatus::parse(raw)?;
        let mut receipt = self.receipts().get(id).await?;
        if let Transition::Moved { .. } = receipt.set_status(to, timestamp::now())? {
            self.receipts().save(&receipt).await?;
        }
        Ok(receipt)
    }

    pub async fn get_delivery_receipt(&self, id: &DocumentId) -> DomainResult<DeliveryReceiptRow> {
        project_one::<S, DeliveryReceipt>(&self.store, id).await
    }

    pub async fn delete_delivery_receipt(&self, id: &DocumentId) -> DomainResult<()> {
        self.receipts().delete(id).await
    }

    pub async fn list_delivery_receipts(&self, request: PageRequest) -> DomainResult<Page<DeliveryReceiptRow>> {
        project_page::<S, DeliveryReceipt>(&self.store, &Filter::new(), request).await
    }

    // Quotations

    pub async fn create_quotation(&self, input: QuotationInput, actor: DocumentId) -> DomainResult<Quotation> {
        let quotation = Quotation::create(input, Some(actor), timestamp::now())?;
        self.quotations().insert(&quotation).await?;
        Ok(quotation)
    }

    pub async fn revise_quotation(&self, id: &DocumentId, items: Vec<QuotationItemInput>) -> DomainResult<Quotation> {
        let mut quotation = self.quotations().get(id).await?;
        quotation.revise(items, timestamp::now())?;
        self.quotations().save(&quotation).await?;
        Ok(quotation)
    }

    pub async fn set_quotation_status(&self, id: &DocumentId, raw: &str, actor: DocumentId) -> DomainResult<Quotation> {
        let to = QuotationStatus::parse(raw)?;
        let mut quotation = self.quotations().get(id).await?;
        if quotation.set_status(to, actor, timestamp::now())?.is_move() {
            self.quotations().save(&quotation).await?;
        }
        Ok(quotation)
    }

    pub async fn delete_quotation(&self, id: &DocumentId) -> DomainResult<()> {
        let quotation = self.quotations().get(id).await?;
        quotation.ensure_deletable()?;
        self.quotations().delete(id).await
    }

    pub async fn get_quotation(&self, id: &DocumentId) -> DomainResult<QuotationRow> {
        project_one::<S, Quotation>(&self.store, id).await
    }

    pub async fn list_quotations(&self, request: PageRequest) -> DomainResult<Page<QuotationRow>> {
        project_page::<S, Quotation>(&self.store, &Filter::new(), request).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use polaris_core::{DomainError, Entity};
    use polaris_inventory::InventoryInput;
    use polaris_parties::CustomerInput;
    use polaris_sales::{OrderItemInput, SalesOrderStatus};

    use super::*;
    use crate::services::CustomerService;
    use crate::store::InMemoryDocumentStore;

    type Store = Arc<InMemoryDocumentStore>;

    async fn seeded() -> (Store, SalesService<Store>, Customer) {
        let store: Store = Arc::new(InMemoryDocumentStore::new());
        InventoryService::new(store.clone())
            .create(
                InventoryInput {
                    sku: "AC-500".into(),
                    barcode: String::new(),
                    model_number: "FTKC".into(),
                    name: "Split 1HP".into(),
                    hp: "1".into(),
                    aircon_type: "split".into(),
                    indoor_outdoor: "indoor".into(),
                    quantity: 20,
                    price: 500,
                },
                None,
            )
            .await
            .unwrap();
        let customer = CustomerService::new(store.clone())
            .create(CustomerInput { name: "Acme".into(), ..CustomerInput::default() })
            .await
            .unwrap();
        (store.clone(), SalesService::new(store), customer)
    }

    fn line(quantity: i64, price: i64) -> OrderItemInput {
        OrderItemInput {
            product_id: None,
            description: "unit".into(),
            quantity,
            uom: "pc".into(),
            price,
        }
    }

    fn invoice_input(customer: &Customer, sku: &str, quantity: i64) -> SalesInvoiceInput {
        SalesInvoiceInput {
            project_id: DocumentId::new(),
            customer_id: customer.id,
            sales_order_id: DocumentId::new(),
            items: vec![InvoiceItemInput { sku: sku.into(), quantity }],
        }
    }

    #[tokio::test]
    async fn order_total_and_unknown_status() {
        let (_, svc, customer) = seeded().await;
        let order = svc
            .create_order(
                SalesOrderInput {
                    project_id: DocumentId::new(),
                    customer_id: customer.id,
                    items: vec![line(2, 100), line(1, 50)],
                },
                DocumentId::new(),
            )
            .await
            .unwrap();
        assert_eq!(order.total_amount, 250);

        let updated = svc
            .update_order(&order.id, SalesOrderUpdate { items: None, status: Some("shipped".into()) })
            .await
            .unwrap();
        assert_eq!(updated.status, SalesOrderStatus::NotApproved);

        let row = svc.get_order(&order.id).await.unwrap();
        assert_eq!(row.customer_name, "Acme");
        assert_eq!(row.project_name, "");
        assert_eq!(row.total_amount, 250);
    }

    #[tokio::test]
    async fn repeated_approval_is_not_rewritten() {
        let (store, svc, customer) = seeded().await;
        let order = svc
            .create_order(
                SalesOrderInput {
                    project_id: DocumentId::new(),
                    customer_id: customer.id,
                    items: vec![line(1, 10)],
                },
                DocumentId::new(),
            )
            .await
            .unwrap();
        let approve = || SalesOrderUpdate { items: None, status: Some("approved".into()) };
        let approved = svc.update_order(&order.id, approve()).await.unwrap();
        assert_eq!(approved.status, SalesOrderStatus::Approved);

        let again = svc.update_order(&order.id, approve()).await.unwrap();
        let stored = Repository::<Store, SalesOrder>::new(store).get(&order.id).await.unwrap();
        assert_eq!(again, approved);
        assert_eq!(stored, approved);
    }

    #[tokio::test]
    async fn invoice_prices_from_catalog_and_keeps_snapshot() {
        let (store, svc, customer) = seeded().await;
        let invoice = svc.create_invoice(invoice_input(&customer, "AC-500", 3), DocumentId::new()).await.unwrap();
        assert_eq!(invoice.items[0].unit_price, 500);
        assert_eq!(invoice.items[0].amount, 1_500);
        assert_eq!(invoice.total_amount, 1_500);

        let inventory = InventoryService::new(store.clone());
        let mut item = inventory.get_by_sku("AC-500").await.unwrap();
        item.price = 800;
        Repository::<Store, polaris_inventory::InventoryItem>::new(store.clone())
            .save(&item)
            .await
            .unwrap();

        let stored = Repository::<Store, SalesInvoice>::new(store).get(&invoice.id).await.unwrap();
        assert_eq!(stored.items[0].unit_price, 500);
        assert_eq!(stored.total_amount, 1_500);
    }

    #[tokio::test]
    async fn unknown_sku_persists_nothing() {
        let (store, svc, customer) = seeded().await;
        let err = svc
            .create_invoice(invoice_input(&customer, "NOPE", 1), DocumentId::new())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidReference(_)));
        assert_eq!(store.count(SalesInvoice::COLLECTION, &Filter::new()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn delivery_receipt_requires_invoice_and_moves_forward_only() {
        let (_, svc, customer) = seeded().await;
        let missing = svc.create_delivery_receipt(&DocumentId::new(), DocumentId::new()).await;
        assert!(matches!(missing, Err(DomainError::InvalidReference(_))));

        let invoice = svc.create_invoice(invoice_input(&customer, "AC-500", 2), DocumentId::new()).await.unwrap();
        let dr = svc.create_delivery_receipt(&invoice.id, DocumentId::new()).await.unwrap();
        assert_eq!(dr.customer.name, "Acme");
        assert_eq!(dr.items.len(), 1);

        svc.set_delivery_status(&dr.id, "Issued").await.unwrap();
        svc.set_delivery_status(&dr.id, "Issued").await.unwrap();
        let back = svc.set_delivery_status(&dr.id, "Ready").await;
        assert!(matches!(back, Err(DomainError::InvalidArgument(_))));

        let row = svc.get_delivery_receipt(&dr.id).await.unwrap();
        assert_eq!(row.invoice_no, invoice.invoice_no);
        assert_eq!(row.status, "Issued");
    }

    #[tokio::test]
    async fn approved_quotations_are_frozen() {
        let (_, svc, _) = seeded().await;
        let q = svc
            .create_quotation(
                QuotationInput {
                    project_id: None,
                    customer_id: None,
                    items: vec![QuotationItemInput { description: "Install".into(), quantity: 2, rate: 1_000 }],
                },
                DocumentId::new(),
            )
            .await
            .unwrap();
        let approver = DocumentId::new();
        let approved = svc.set_quotation_status(&q.id, "approved", approver).await.unwrap();
        assert_eq!(approved.approved_by, Some(approver));
        assert!(matches!(svc.delete_quotation(&q.id).await, Err(DomainError::InvalidArgument(_))));

        let reverted = svc.set_quotation_status(&q.id, "pending", approver).await.unwrap();
        assert_eq!(reverted.approved_by, None);
        svc.delete_quotation(&q.id).await.unwrap();
    }
}
