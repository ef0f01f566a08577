//! Headline numbers for the landing dashboard.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use polaris_core::{DateRange, DomainError, DomainResult, Entity, collections};
use polaris_infra::store::{DocumentStore, Filter, FindOptions};
use polaris_sales::SalesInvoice;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuotationCounts {
    pub pending: u64,
    pub approved: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlySales {
    /// 1-based.
    pub month: u32,
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub year: i32,
    pub open_sales_orders: u64,
    pub delivery_receipts: u64,
    pub quotations: QuotationCounts,
    pub monthly_sales: Vec<MonthlySales>,
}

#[derive(Clone)]
pub struct DashboardService<S> {
    store: S,
}

impl<S: DocumentStore> DashboardService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn summary(&self, year: i32) -> DomainResult<Dashboard> {
        let open = Filter::new().is_in("status", ["notapproved", "approved"]);
        let open_sales_orders = self.store.count(collections::SALES_ORDER, &open).await?;
        let delivery_receipts = self.store.count(collections::DELIVERY_RECEIPT, &Filter::new()).await?;
        let quotations = QuotationCounts {
            pending: self.store.count(collections::QUOTATION, &Filter::new().eq("status", "pending")).await?,
            approved: self.store.count(collections::QUOTATION, &Filter::new().eq("status", "approved")).await?,
        };
        let monthly_sales = self.monthly_sales(year).await?;
        Ok(Dashboard { year, open_sales_orders, delivery_receipts, quotations, monthly_sales })
    }

    /// Sum of sales invoice totals per calendar month, always 12 buckets.
    pub async fn monthly_sales(&self, year: i32) -> DomainResult<Vec<MonthlySales>> {
        let (Some(first), Some(last)) = (NaiveDate::from_ymd_opt(year, 1, 1), NaiveDate::from_ymd_opt(year, 12, 31))
        else {
            return Err(DomainError::invalid_argument(format!("year {year} out of range")));
        };
        let (lo, hi) = DateRange::from_days(first, last)?.keys();
        let docs = self
            .store
            .find(SalesInvoice::COLLECTION, &Filter::new().between("created_at", lo, hi), FindOptions::default())
            .await?;

        let mut buckets: Vec<MonthlySales> = (1..=12).map(|month| MonthlySales { month, total: 0 }).collect();
        for doc in docs {
            let invoice: SalesInvoice = polaris_infra::store::from_document(doc)?;
            let bucket = &mut buckets[invoice.created_at.month0() as usize];
            bucket.total = bucket
                .total
                .checked_add(invoice.total_amount)
                .ok_or_else(|| DomainError::internal("monthly sales total overflow"))?;
        }
        Ok(buckets)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use polaris_core::DocumentId;
    use polaris_infra::{InMemoryDocumentStore, Repository};

    use super::*;

    fn invoice(total: i64, y: i32, m: u32) -> SalesInvoice {
        let at = Utc.with_ymd_and_hms(y, m, 10, 8, 0, 0).unwrap();
        SalesInvoice {
            id: DocumentId::new(),
            invoice_no: format!("INV-{y}{m:02}"),
            project_id: DocumentId::new(),
            customer_id: DocumentId::new(),
            sales_order_id: DocumentId::new(),
            items: Vec::new(),
            total_amount: total,
            created_by: None,
            created_at: at,
            updated_at: at,
        }
    }

    #[tokio::test]
    async fn monthly_buckets_cover_the_year() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let repo = Repository::<_, SalesInvoice>::new(store.clone());
        repo.insert(&invoice(1_000, 2024, 1)).await.unwrap();
        repo.insert(&invoice(500, 2024, 1)).await.unwrap();
        repo.insert(&invoice(700, 2024, 12)).await.unwrap();
        repo.insert(&invoice(9_999, 2023, 12)).await.unwrap();

        let dash = DashboardService::new(store).summary(2024).await.unwrap();
        assert_eq!(dash.monthly_sales.len(), 12);
        assert_eq!(dash.monthly_sales[0], MonthlySales { month: 1, total: 1_500 });
        assert_eq!(dash.monthly_sales[5].total, 0);
        assert_eq!(dash.monthly_sales[11].total, 700);
        assert_eq!(dash.open_sales_orders, 0);
        assert_eq!(dash.quotations, QuotationCounts { pending: 0, approved: 0 });
    }
}
