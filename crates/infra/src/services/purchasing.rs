use polaris_core::{DocumentId, DomainResult, Page, PageRequest, timestamp};
use polaris_purchasing::{
    SupplierDeliveryReceipt, SupplierDrInput, SupplierInvoice, SupplierInvoiceInput, SupplierPo, SupplierPoInput,
    SupplierPoUpdate,
};

use crate::projections::views::{SupplierDrRow, SupplierInvoiceRow, SupplierPoRow};
use crate::projections::{project_one, project_page};
use crate::repository::Repository;
use crate::store::{DocumentStore, Filter, id_value};

/// Supplier purchase orders, supplier invoices and supplier delivery receipts.
#[derive(Clone)]
pub struct PurchasingService<S> {
    store: S,
}

impl<S: DocumentStore + Clone> PurchasingService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn orders(&self) -> Repository<S, SupplierPo> {
        Repository::new(self.store.clone())
    }

    fn invoices(&self) -> Repository<S, SupplierInvoice> {
        Repository::new(self.store.clone())
    }

    fn receipts(&self) -> Repository<S, SupplierDeliveryReceipt> {
        Repository::new(self.store.clone())
    }

    pub async fn create_order(&self, input: SupplierPoInput, actor: DocumentId) -> DomainResult<SupplierPo> {
        let po = SupplierPo::create(input, Some(actor), timestamp::now())?;
        self.orders().insert(&po).await?;
        Ok(po)
    }

    /// Items and status travel in one update; either both apply or neither.
    pub async fn update_order(
        &self,
        id: &DocumentId,
        update: SupplierPoUpdate,
        actor: DocumentId,
    ) -> DomainResult<SupplierPo> {
        let mut po = self.orders().get(id).await?;
        if po.apply_update(update, actor, timestamp::now())? {
            self.orders().save(&po).await?;
        }
        Ok(po)
    }

    pub async fn get_order(&self, id: &DocumentId) -> DomainResult<SupplierPoRow> {
        project_one::<S, SupplierPo>(&self.store, id).await
    }

    pub async fn delete_order(&self, id: &DocumentId) -> DomainResult<()> {
        self.orders().delete(id).await
    }

    pub async fn list_orders(&self, request: PageRequest) -> DomainResult<Page<SupplierPoRow>> {
        project_page::<S, SupplierPo>(&self.store, &Filter::new(), request).await
    }

    pub async fn list_orders_by_supplier(
        &self,
        supplier_id: &DocumentId,
        request: PageRequest,
    ) -> DomainResult<Page<SupplierPoRow>> {
        let filter = Filter::new().eq("supplier_id", id_value(supplier_id));
        project_page::<S, SupplierPo>(&self.store, &filter, request).await
    }

    pub async fn create_invoice(&self, input: SupplierInvoiceInput, actor: DocumentId) -> DomainResult<SupplierInvoice> {
        let invoice = SupplierInvoice::create(input, Some(actor), timestamp::now())?;
        self.invoices().insert(&invoice).await?;
        Ok(invoice)
    }

    pub async fn update_invoice(&self, id: &DocumentId, input: SupplierInvoiceInput) -> DomainResult<SupplierInvoice> {
        let mut invoice = self.invoices().get(id).await?;
        invoice.update(input, timestamp::now())?;
        self.invoices().save(&invoice).await?;
        Ok(invoice)
    }

    pub async fn get_invoice(&self, id: &DocumentId) -> DomainResult<SupplierInvoiceRow> {
        project_one::<S, SupplierInvoice>(&self.store, id).await
    }

    pub async fn delete_invoice(&self, id: &DocumentId) -> DomainResult<()> {
        self.invoices().delete(id).await
    }

    pub async fn list_invoices(&self, request: PageRequest) -> DomainResult<Page<SupplierInvoiceRow>> {
        project_page::<S, SupplierInvoice>(&self.store, &Filter::new(), request).await
    }

    pub async fn create_delivery_receipt(
        &self,
        input: SupplierDrInput,
        actor: DocumentId,
    ) -> DomainResult<SupplierDeliveryReceipt> {
        let dr = SupplierDeliveryReceipt::create(input, Some(actor), timestamp::now())?;
        self.receipts().insert(&dr).await?;
        Ok(dr)
    }

    pub async fn update_delivery_receipt(
        &self,
        id: &DocumentId,
        input: SupplierDrInput,
    ) -> DomainResult<SupplierDeliveryReceipt> {
        let mut dr = self.receipts().get(id).await?;
        dr.update(input, timestamp::now())?;
        self.receipts().save(&dr).await?;
        Ok(dr)
    }

    pub async fn get_delivery_receipt(&self, id: &DocumentId) -> DomainResult<SupplierDrRow> {
        project_one::<S, SupplierDeliveryReceipt>(&self.store, id).await
    }

    pub async fn delete_delivery_receipt(&self, id: &DocumentId) -> DomainResult<()> {
        self.receipts().delete(id).await
    }

    pub async fn list_delivery_receipts(&self, request: PageRequest) -> DomainResult<Page<SupplierDrRow>> {
        project_page::<S, SupplierDeliveryReceipt>(&self.store, &Filter::new(), request).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use polaris_core::DomainError;
    use polaris_parties::SupplierInput;
    use polaris_purchasing::{PoItemInput, PoStatus};

    use super::*;
    use crate::services::SupplierService;
    use crate::store::InMemoryDocumentStore;

    fn po_input(supplier_id: DocumentId) -> SupplierPoInput {
        SupplierPoInput {
            project_id: DocumentId::new(),
            supplier_id,
            sales_order_id: None,
            customer_po_ids: vec![],
            items: vec![PoItemInput { description: "Compressor".into(), quantity: 3, uom: "pc".into(), rate: 700 }],
        }
    }

    fn status(raw: &str) -> SupplierPoUpdate {
        SupplierPoUpdate { items: None, status: Some(raw.into()) }
    }

    #[tokio::test]
    async fn po_moves_one_step_at_a_time() {
        let svc = PurchasingService::new(Arc::new(InMemoryDocumentStore::new()));
        let po = svc.create_order(po_input(DocumentId::new()), DocumentId::new()).await.unwrap();
        assert_eq!(po.total_amount, 2_100);

        let skip = svc.update_order(&po.id, status("sent"), DocumentId::new()).await;
        assert!(matches!(skip, Err(DomainError::InvalidArgument(_))));

        let approver = DocumentId::new();
        let approved = svc.update_order(&po.id, status("approved"), approver).await.unwrap();
        assert_eq!(approved.status, PoStatus::Approved);
        assert_eq!(approved.approved_by, Some(approver));

        let again = svc.update_order(&po.id, status("approved"), DocumentId::new()).await.unwrap();
        assert_eq!(again.approved_by, Some(approver));
    }

    #[tokio::test]
    async fn list_by_supplier_projects_names() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let supplier = SupplierService::new(store.clone())
            .create(SupplierInput {
                supplier_code: "SUP-9".into(),
                name: "Cold Supply Co".into(),
                organization: String::new(),
                tin: String::new(),
                location: String::new(),
            })
            .await
            .unwrap();
        let svc = PurchasingService::new(store);
        svc.create_order(po_input(supplier.id), DocumentId::new()).await.unwrap();
        svc.create_order(po_input(DocumentId::new()), DocumentId::new()).await.unwrap();

        let page = svc.list_orders_by_supplier(&supplier.id, PageRequest::default()).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].supplier_name, "Cold Supply Co");
    }
}
