//! Single-currency, time-ordered collection of operations
//!
//! Range slices are inclusive on both ends: an operation belongs to
//! `slice(from, till)` when `from <= timestamp <= till`.

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::error::{LogbookError, LogbookResult};
use crate::models::{Currency, Money, Operation};

/// Operations of one currency kept sorted by timestamp, with a running sum
#[derive(Debug, Clone, Default)]
pub struct Logbook {
    operations: Vec<Arc<Operation>>,
    sum: Option<Money>,
}

impl Logbook {
    /// Create an empty logbook
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an operation
    ///
    /// Rejects operations whose currency differs from the operations already
    /// registered; a rejected operation leaves the logbook unchanged.
    pub fn register(&mut self, operation: Arc<Operation>) -> LogbookResult<()> {
        let sum = match &self.sum {
            None => operation.amount.clone(),
            Some(sum) if sum.same_currency(&operation.amount) => {
                sum.checked_add(&operation.amount)?
            }
            Some(sum) => {
                return Err(LogbookError::UnexpectedCurrency {
                    operation: operation.id,
                    expected: sum.currency().clone(),
                    actual: operation.amount.currency().clone(),
                })
            }
        };

        // Equal timestamps keep arrival order.
        let index = self
            .operations
            .partition_point(|existing| existing.timestamp <= operation.timestamp);
        self.operations.insert(index, operation);
        self.sum = Some(sum);
        Ok(())
    }

    /// Operations in timestamp order
    pub fn operations(&self) -> &[Arc<Operation>] {
        &self.operations
    }

    /// Iterate over operations in timestamp order
    pub fn iter(&self) -> impl Iterator<Item = &Operation> {
        self.operations.iter().map(AsRef::as_ref)
    }

    /// Number of registered operations
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Check if no operation has been registered
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Earliest timestamp, or the minimum instant while empty
    pub fn from(&self) -> DateTime<Utc> {
        self.operations
            .first()
            .map_or(DateTime::<Utc>::MIN_UTC, |op| op.timestamp)
    }

    /// Latest timestamp, or the maximum instant while empty
    pub fn till(&self) -> DateTime<Utc> {
        self.operations
            .last()
            .map_or(DateTime::<Utc>::MAX_UTC, |op| op.timestamp)
    }

    /// Sum of all amounts, `None` while empty
    pub fn sum(&self) -> Option<&Money> {
        self.sum.as_ref()
    }

    /// The established currency, `None` while empty
    pub fn currency(&self) -> Option<&Currency> {
        self.sum.as_ref().map(Money::currency)
    }

    /// Sum of positive amounts
    pub fn income(&self) -> Option<Money> {
        self.partial_sum(Operation::is_income)
    }

    /// Sum of negative amounts
    pub fn expenses(&self) -> Option<Money> {
        self.partial_sum(Operation::is_withdraw)
    }

    fn partial_sum(&self, include: fn(&Operation) -> bool) -> Option<Money> {
        let currency = self.currency()?.clone();
        let amount = self
            .iter()
            .filter(|op| include(op))
            .map(|op| op.amount.amount())
            .sum();
        Some(Money::new(amount, currency))
    }

    /// Operations with `from <= timestamp <= till` as a new logbook
    ///
    /// The original logbook is not modified.
    pub fn slice(&self, from: DateTime<Utc>, till: DateTime<Utc>) -> Logbook {
        let start = self.operations.partition_point(|op| op.timestamp < from);
        let end = self.operations.partition_point(|op| op.timestamp <= till);
        let operations = if start < end {
            self.operations[start..end].to_vec()
        } else {
            Vec::new()
        };
        Self::from_sorted(operations)
    }

    /// Union of two logbooks of the same currency, re-sorted by timestamp
    ///
    /// Operations of `self` precede operations of `other` on equal
    /// timestamps.
    pub fn merge(&self, other: &Logbook) -> LogbookResult<Logbook> {
        let mut merged = self.clone();
        for operation in &other.operations {
            merged.register(Arc::clone(operation))?;
        }
        Ok(merged)
    }

    fn from_sorted(operations: Vec<Arc<Operation>>) -> Self {
        let sum = operations.first().map(|first| {
            let amount = operations.iter().map(|op| op.amount.amount()).sum();
            Money::new(amount, first.amount.currency().clone())
        });
        Self { operations, sum }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetId, Currency};
    use chrono::{Duration, TimeZone};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn op(day: i64, amount: Decimal, currency: &str) -> Arc<Operation> {
        Arc::new(Operation::new(
            BudgetId::new(),
            start() + Duration::days(day),
            Money::new(amount, Currency::new(currency).unwrap()),
        ))
    }

    #[test]
    fn test_empty_logbook_is_open_ended() {
        let logbook = Logbook::new();
        assert!(logbook.is_empty());
        assert_eq!(logbook.from(), DateTime::<Utc>::MIN_UTC);
        assert_eq!(logbook.till(), DateTime::<Utc>::MAX_UTC);
        assert!(logbook.sum().is_none());
        assert!(logbook.currency().is_none());
    }

    #[test]
    fn test_register_keeps_order_and_sum() {
        let mut logbook = Logbook::new();
        for (day, amount) in [(5, dec!(10)), (1, dec!(-3.5)), (3, dec!(2.25))] {
            logbook.register(op(day, amount, "EUR")).unwrap();
        }

        let days: Vec<i64> = logbook
            .iter()
            .map(|o| (o.timestamp - start()).num_days())
            .collect();
        assert_eq!(days, vec![1, 3, 5]);
        assert_eq!(logbook.sum().unwrap().amount(), dec!(8.75));
        assert_eq!(logbook.from(), start() + Duration::days(1));
        assert_eq!(logbook.till(), start() + Duration::days(5));
        assert_eq!(logbook.income().unwrap().amount(), dec!(12.25));
        assert_eq!(logbook.expenses().unwrap().amount(), dec!(-3.5));
    }

    #[test]
    fn test_sum_is_order_independent() {
        let ops: Vec<_> = (0..10)
            .map(|i| op(i * 7 % 10, Decimal::from(i * 3 - 11), "EUR"))
            .collect();

        let mut forward = Logbook::new();
        let mut backward = Logbook::new();
        for o in &ops {
            forward.register(Arc::clone(o)).unwrap();
        }
        for o in ops.iter().rev() {
            backward.register(Arc::clone(o)).unwrap();
        }

        assert_eq!(forward.sum(), backward.sum());
        assert_eq!(forward.from(), backward.from());
        assert_eq!(forward.till(), backward.till());
    }

    #[test]
    fn test_equal_timestamps_keep_arrival_order() {
        let first = op(2, dec!(1), "EUR");
        let second = op(2, dec!(2), "EUR");
        let mut logbook = Logbook::new();
        logbook.register(Arc::clone(&first)).unwrap();
        logbook.register(Arc::clone(&second)).unwrap();

        assert_eq!(logbook.operations()[0].id, first.id);
        assert_eq!(logbook.operations()[1].id, second.id);
    }

    #[test]
    fn test_unexpected_currency_is_rejected_without_change() {
        let mut logbook = Logbook::new();
        logbook.register(op(1, dec!(10), "EUR")).unwrap();

        for _ in 0..2 {
            let result = logbook.register(op(2, dec!(5), "USD"));
            assert!(matches!(
                result,
                Err(LogbookError::UnexpectedCurrency { .. })
            ));
            assert_eq!(logbook.len(), 1);
            assert_eq!(logbook.sum().unwrap().amount(), dec!(10));
        }
    }

    #[test]
    fn test_slice_is_inclusive_and_pure() {
        let mut logbook = Logbook::new();
        for day in 0..10 {
            logbook.register(op(day, Decimal::from(day), "EUR")).unwrap();
        }

        let from = start() + Duration::days(2);
        let till = start() + Duration::days(5);
        let slice = logbook.slice(from, till);
        let again = logbook.slice(from, till);

        assert_eq!(slice.len(), 4);
        assert_eq!(slice.from(), from);
        assert_eq!(slice.till(), till);
        assert_eq!(slice.sum().unwrap().amount(), dec!(14));
        assert_eq!(slice.sum(), again.sum());
        assert_eq!(logbook.len(), 10);
        assert_eq!(logbook.sum().unwrap().amount(), dec!(45));
    }

    #[test]
    fn test_slice_outside_range_is_empty() {
        let mut logbook = Logbook::new();
        logbook.register(op(3, dec!(1), "EUR")).unwrap();

        let slice = logbook.slice(start() + Duration::days(5), start() + Duration::days(1));
        assert!(slice.is_empty());
        assert!(slice.sum().is_none());
    }

    #[test]
    fn test_merge() {
        let mut left = Logbook::new();
        let mut right = Logbook::new();
        left.register(op(1, dec!(1), "EUR")).unwrap();
        left.register(op(4, dec!(4), "EUR")).unwrap();
        right.register(op(2, dec!(2), "EUR")).unwrap();

        let merged = left.merge(&right).unwrap();
        assert_eq!(merged.len(), 3);
        assert_eq!(merged.sum().unwrap().amount(), dec!(7));
        assert_eq!(left.len(), 2);

        let mut dollars = Logbook::new();
        dollars.register(op(1, dec!(1), "USD")).unwrap();
        assert!(left.merge(&dollars).is_err());
    }
}
