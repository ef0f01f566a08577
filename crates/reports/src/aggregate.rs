//! Report aggregation over the document store.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use polaris_core::{DateRange, DomainResult, Entity, collections};
use polaris_infra::projections::{RefSet, ResolvedRefs, Resolver};
use polaris_infra::store::{DocumentStore, Filter, FindOptions, Sort};
use polaris_infra::Repository;
use polaris_inventory::InventoryItem;
use polaris_parties::{Customer, Supplier};
use polaris_purchasing::SupplierInvoice;
use polaris_sales::SalesInvoice;

use crate::request::{ReportRequest, ReportType};
use crate::table::{Cell, Report, Table};

pub const PURCHASE: &str = "Purchase";
pub const SALES: &str = "Sales";

/// One ledger line of the financial report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinancialRow {
    pub category: &'static str,
    pub document_no: String,
    pub project: String,
    pub counterpart: String,
    pub amount: i64,
    pub date: NaiveDate,
}

impl FinancialRow {
    fn cells(self) -> Vec<Cell> {
        vec![
            Cell::text(self.category),
            Cell::Text(self.document_no),
            Cell::Text(self.project),
            Cell::Text(self.counterpart),
            Cell::Money(self.amount),
            Cell::Text(self.date.format("%Y-%m-%d").to_string()),
        ]
    }
}

fn day(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d").to_string()
}

pub struct ReportAggregator<'a, S> {
    store: &'a S,
}

impl<'a, S: DocumentStore + Clone> ReportAggregator<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    async fn created_within<T: Entity>(&self, range: &DateRange) -> DomainResult<Vec<T>> {
        let (lo, hi) = range.keys();
        Repository::<S, T>::new(self.store.clone())
            .find(&Filter::new().between("created_at", lo, hi), FindOptions::sorted(Sort::asc("created_at")))
            .await
    }

    pub async fn build(&self, request: &ReportRequest) -> DomainResult<Report> {
        let kind = request.report_type;
        let mut table = Table::new(kind.columns());
        match kind {
            ReportType::Customer => {
                for c in self.created_within::<Customer>(&request.range).await? {
                    table.push(vec![
                        Cell::Text(c.name),
                        Cell::Text(c.organization),
                        Cell::Text(c.address),
                        Cell::Text(c.tin),
                        Cell::Text(day(&c.created_at)),
                    ]);
                }
            }
            ReportType::Inventory => {
                for i in self.created_within::<InventoryItem>(&request.range).await? {
                    table.push(vec![
                        Cell::Text(i.sku),
                        Cell::Text(i.model_number),
                        Cell::Text(i.name),
                        Cell::Text(i.hp),
                        Cell::Text(i.aircon_type),
                        Cell::Text(i.indoor_outdoor),
                        Cell::Count(i.quantity),
                        Cell::Money(i.price),
                        Cell::Text(day(&i.created_at)),
                    ]);
                }
            }
            ReportType::Supplier => {
                for s in self.created_within::<Supplier>(&request.range).await? {
                    table.push(vec![
                        Cell::Text(s.supplier_code),
                        Cell::Text(s.name),
                        Cell::Text(s.organization),
                        Cell::Text(s.tin),
                        Cell::Text(s.location),
                        Cell::Text(day(&s.created_at)),
                    ]);
                }
            }
            ReportType::Sales => {
                let invoices = self.created_within::<SalesInvoice>(&request.range).await?;
                let names = self.resolve_sales_names(&invoices).await;
                for inv in invoices {
                    table.push(vec![
                        Cell::Text(inv.invoice_no),
                        Cell::Text(names.text(collections::PROJECT, &inv.project_id, "name")),
                        Cell::Text(names.text(collections::CUSTOMER, &inv.customer_id, "name")),
                        Cell::Money(inv.total_amount),
                        Cell::Text(day(&inv.created_at)),
                    ]);
                }
            }
            ReportType::Financial => {
                for row in self.financial_rows(&request.range).await? {
                    table.push(row.cells());
                }
            }
        }
        tracing::info!(report_type = kind.as_str(), rows = table.len(), "report aggregated");
        Ok(Report { report_type: kind, range: request.range, table })
    }

    async fn resolve_sales_names(&self, invoices: &[SalesInvoice]) -> ResolvedRefs {
        let mut refs = RefSet::new();
        for inv in invoices {
            refs.add(collections::PROJECT, inv.project_id);
            refs.add(collections::CUSTOMER, inv.customer_id);
        }
        Resolver::new(self.store).resolve(&refs).await
    }

    /// Purchase rows then sales rows, each in stream order; no re-sort after the merge.
    pub async fn financial_rows(&self, range: &DateRange) -> DomainResult<Vec<FinancialRow>> {
        let purchases = self.created_within::<SupplierInvoice>(range).await?;
        let sales = self.created_within::<SalesInvoice>(range).await?;

        let mut refs = RefSet::new();
        for p in &purchases {
            refs.add(collections::PROJECT, p.project_id);
            refs.add(collections::SUPPLIER, p.supplier_id);
        }
        for s in &sales {
            refs.add(collections::PROJECT, s.project_id);
            refs.add(collections::CUSTOMER, s.customer_id);
        }
        let names = Resolver::new(self.store).resolve(&refs).await;

        let purchase_rows = purchases.into_iter().map(|p| FinancialRow {
            category: PURCHASE,
            project: names.text(collections::PROJECT, &p.project_id, "name"),
            counterpart: names.text(collections::SUPPLIER, &p.supplier_id, "name"),
            amount: p.grand_total,
            date: p.invoice_date,
            document_no: p.invoice_no,
        });
        let sales_rows = sales.into_iter().map(|s| FinancialRow {
            category: SALES,
            project: names.text(collections::PROJECT, &s.project_id, "name"),
            counterpart: names.text(collections::CUSTOMER, &s.customer_id, "name"),
            amount: s.total_amount,
            date: s.created_at.date_naive(),
            document_no: s.invoice_no,
        });
        Ok(purchase_rows.chain(sales_rows).collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::TimeZone;
    use polaris_core::DocumentId;
    use polaris_infra::InMemoryDocumentStore;
    use polaris_sales::InvoiceItem;

    use super::*;
    use crate::request::{ExportFormat, ReportQuery};

    type Store = Arc<InMemoryDocumentStore>;

    fn at(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, d, 9, 30, 0).unwrap()
    }

    fn supplier_invoice(project_id: DocumentId, supplier_id: DocumentId, grand_total: i64, d: u32) -> SupplierInvoice {
        SupplierInvoice {
            id: DocumentId::new(),
            supplier_id,
            project_id,
            invoice_no: "SI-77".into(),
            invoice_date: NaiveDate::from_ymd_opt(2024, 6, d).unwrap(),
            due_date: None,
            delivery_no: String::new(),
            sap_ref_no: String::new(),
            purchase_order_no: String::new(),
            delivery_address: String::new(),
            items: Vec::new(),
            total_sales: grand_total,
            vat: 0,
            grand_total,
            created_by: None,
            created_at: at(d),
            updated_at: at(d),
        }
    }

    fn sales_invoice(project_id: DocumentId, customer_id: DocumentId, total: i64, d: u32) -> SalesInvoice {
        SalesInvoice {
            id: DocumentId::new(),
            invoice_no: "INV-20240605093000".into(),
            project_id,
            customer_id,
            sales_order_id: DocumentId::new(),
            items: vec![InvoiceItem { sku: "AC-1".into(), quantity: 1, unit_price: total, amount: total }],
            total_amount: total,
            created_by: None,
            created_at: at(d),
            updated_at: at(d),
        }
    }

    fn financial_request(start: &str, end: &str) -> ReportRequest {
        ReportRequest::parse(&ReportQuery {
            report_type: "financial".into(),
            start_date: start.into(),
            end_date: end.into(),
            export_type: "csv".into(),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn financial_report_lists_purchases_then_sales() {
        let store: Store = Arc::new(InMemoryDocumentStore::new());
        // Inserted sales first to show the merge does not follow insertion order.
        Repository::<Store, SalesInvoice>::new(store.clone())
            .insert(&sales_invoice(DocumentId::new(), DocumentId::new(), 2000, 5))
            .await
            .unwrap();
        Repository::<Store, SupplierInvoice>::new(store.clone())
            .insert(&supplier_invoice(DocumentId::new(), DocumentId::new(), 1000, 3))
            .await
            .unwrap();

        let request = financial_request("2024-06-01", "2024-06-30");
        let rows = ReportAggregator::new(&store).financial_rows(&request.range).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].category, rows[0].amount), (PURCHASE, 1000));
        assert_eq!((rows[1].category, rows[1].amount), (SALES, 2000));
        // Unresolved project and counterpart degrade to empty text.
        assert_eq!(rows[0].project, "");
        assert_eq!(rows[1].counterpart, "");
        assert_eq!(request.format, ExportFormat::Csv);
    }

    #[tokio::test]
    async fn range_end_covers_the_whole_last_day() {
        let store: Store = Arc::new(InMemoryDocumentStore::new());
        let repo = Repository::<Store, SalesInvoice>::new(store.clone());
        repo.insert(&sales_invoice(DocumentId::new(), DocumentId::new(), 100, 5)).await.unwrap();
        repo.insert(&sales_invoice(DocumentId::new(), DocumentId::new(), 100, 6)).await.unwrap();

        let report = ReportAggregator::new(&store).build(&financial_request("2024-06-05", "2024-06-05")).await.unwrap();
        assert_eq!(report.table.len(), 1);
    }

    #[tokio::test]
    async fn sales_report_resolves_names() {
        let store: Store = Arc::new(InMemoryDocumentStore::new());
        let customer = polaris_parties::Customer::create(
            polaris_parties::CustomerInput { name: "Acme".into(), ..Default::default() },
            "CUST-2024-00001".into(),
            at(1),
        )
        .unwrap();
        Repository::<Store, Customer>::new(store.clone()).insert(&customer).await.unwrap();
        Repository::<Store, SalesInvoice>::new(store.clone())
            .insert(&sales_invoice(DocumentId::new(), customer.id, 2500, 4))
            .await
            .unwrap();

        let request = ReportRequest::parse(&ReportQuery {
            report_type: "sales".into(),
            start_date: "2024-06-01".into(),
            end_date: "2024-06-30".into(),
            export_type: "excel".into(),
        })
        .unwrap();
        let report = ReportAggregator::new(&store).build(&request).await.unwrap();
        assert_eq!(report.table.rows[0][2], Cell::text("Acme"));
        assert_eq!(report.table.rows[0][3], Cell::Money(2500));
        assert_eq!(report.table.rows[0][4], Cell::text("2024-06-04"));
    }
}
