//! Line-item total calculator.
//!
//! Every order-like document stores `amount = quantity × price` per line and a
//! document total equal to the sum of the line amounts. Totals are always
//! recomputed from the full item list; nothing is adjusted incrementally.

use std::collections::HashMap;

use crate::{DomainError, DomainResult};

/// A priced line of an order, invoice, purchase order or quotation.
///
/// Prices and amounts are integer minor units (centavos).
pub trait LineItem {
    fn quantity(&self) -> i64;
    fn price(&self) -> i64;
    fn amount(&self) -> i64;
    fn set_amount(&mut self, amount: i64);
}

/// A line whose price is taken from the inventory catalog by SKU.
pub trait CatalogLine: LineItem {
    fn sku(&self) -> &str;
    fn set_price(&mut self, price: i64);
}

/// Authoritative SKU → price source.
pub trait PriceCatalog {
    fn price_of(&self, sku: &str) -> Option<i64>;
}

impl PriceCatalog for HashMap<String, i64> {
    fn price_of(&self, sku: &str) -> Option<i64> {
        self.get(sku).copied()
    }
}

pub fn line_amount(quantity: i64, price: i64) -> DomainResult<i64> {
    if quantity <= 0 {
        return Err(DomainError::invalid_argument("quantity must be positive"));
    }
    if price < 0 {
        return Err(DomainError::invalid_argument("price must not be negative"));
    }
    quantity
        .checked_mul(price)
        .ok_or_else(|| DomainError::invalid_argument("line amount overflows"))
}

/// Recompute every line amount and return the document total.
///
/// Caller-supplied prices are trusted (sales orders, supplier POs, quotations).
pub fn recompute<T: LineItem>(items: &mut [T]) -> DomainResult<i64> {
    if items.is_empty() {
        return Err(DomainError::invalid_argument("at least one line item is required"));
    }
    let mut total: i64 = 0;
    for item in items.iter_mut() {
        let amount = line_amount(item.quantity(), item.price())?;
        item.set_amount(amount);
        total = total
            .checked_add(amount)
            .ok_or_else(|| DomainError::invalid_argument("document total overflows"))?;
    }
    Ok(total)
}

/// Snapshot catalog prices into the lines, then recompute.
///
/// Every SKU is resolved before any line is touched, so a missing SKU leaves
/// `items` unchanged.
pub fn recompute_from_catalog<T: CatalogLine>(
    items: &mut [T],
    catalog: &impl PriceCatalog,
) -> DomainResult<i64> {
    let prices = items
        .iter()
        .map(|item| {
            catalog
                .price_of(item.sku())
                .ok_or_else(|| DomainError::invalid_reference(format!("SKU not found: {}", item.sku())))
        })
        .collect::<DomainResult<Vec<i64>>>()?;

    for (item, price) in items.iter_mut().zip(prices) {
        item.set_price(price);
    }
    recompute(items)
}

/// `true` when every line amount and the total agree with quantity × price.
pub fn totals_consistent<T: LineItem>(items: &[T], total: i64) -> bool {
    let lines_ok = items
        .iter()
        .all(|i| i.quantity().checked_mul(i.price()) == Some(i.amount()));
    lines_ok && items.iter().map(|i| i.amount()).sum::<i64>() == total
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    struct Line {
        sku: String,
        qty: i64,
        price: i64,
        amount: i64,
    }

    impl LineItem for Line {
        fn quantity(&self) -> i64 {
            self.qty
        }
        fn price(&self) -> i64 {
            self.price
        }
        fn amount(&self) -> i64 {
            self.amount
        }
        fn set_amount(&mut self, amount: i64) {
            self.amount = amount;
        }
    }

    impl CatalogLine for Line {
        fn sku(&self) -> &str {
            &self.sku
        }
        fn set_price(&mut self, price: i64) {
            self.price = price;
        }
    }

    fn line(sku: &str, qty: i64, price: i64) -> Line {
        Line {
            sku: sku.to_string(),
            qty,
            price,
            amount: -1,
        }
    }

    #[test]
    fn order_total_is_sum_of_subtotals() {
        let mut items = vec![line("", 2, 100), line("", 1, 50)];
        assert_eq!(recompute(&mut items).unwrap(), 250);
        assert_eq!(items[0].amount, 200);
        assert_eq!(items[1].amount, 50);
    }

    #[test]
    fn catalog_price_overrides_caller_price() {
        let catalog: HashMap<String, i64> = [("AC-1".to_string(), 500)].into_iter().collect();
        let mut items = vec![line("AC-1", 3, 0)];
        assert_eq!(recompute_from_catalog(&mut items, &catalog).unwrap(), 1500);
        assert_eq!(items[0].price, 500);
        assert_eq!(items[0].amount, 1500);
    }

    #[test]
    fn missing_sku_is_invalid_reference_and_leaves_items_untouched() {
        let catalog: HashMap<String, i64> = [("AC-1".to_string(), 500)].into_iter().collect();
        let mut items = vec![line("AC-1", 1, 7), line("NOPE", 1, 9)];
        let err = recompute_from_catalog(&mut items, &catalog).unwrap_err();
        match err {
            DomainError::InvalidReference(msg) if msg.contains("NOPE") => {}
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(items[0].price, 7);
        assert_eq!(items[0].amount, -1);
    }

    #[test]
    fn empty_and_non_positive_lines_are_rejected() {
        let mut empty: Vec<Line> = vec![];
        assert!(matches!(recompute(&mut empty), Err(DomainError::InvalidArgument(_))));
        let mut zero = vec![line("", 0, 10)];
        assert!(matches!(recompute(&mut zero), Err(DomainError::InvalidArgument(_))));
        let mut negative = vec![line("", 1, -10)];
        assert!(matches!(recompute(&mut negative), Err(DomainError::InvalidArgument(_))));
    }

    #[test]
    fn overflow_is_reported() {
        let mut items = vec![line("", i64::MAX, 2)];
        assert!(matches!(recompute(&mut items), Err(DomainError::InvalidArgument(_))));
    }

    proptest! {
        #[test]
        fn recomputed_documents_are_consistent(
            lines in prop::collection::vec((1i64..1_000, 0i64..10_000_000), 1..20)
        ) {
            let mut items: Vec<Line> = lines.iter().map(|(q, p)| line("", *q, *p)).collect();
            let total = recompute(&mut items).unwrap();
            prop_assert!(totals_consistent(&items, total));
        }

        #[test]
        fn recompute_is_idempotent(
            lines in prop::collection::vec((1i64..1_000, 0i64..10_000_000), 1..20)
        ) {
            let mut items: Vec<Line> = lines.iter().map(|(q, p)| line("", *q, *p)).collect();
            let first = recompute(&mut items).unwrap();
            let second = recompute(&mut items).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
