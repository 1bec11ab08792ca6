//! Classification Report
//!
//! Flattens a criteria-based logbook into one row per node, parents before
//! their children, siblings in description order.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;

use crate::display::{double_separator, format_range, format_sum, indent, separator, truncate};
use crate::logbook::{CriteriaBasedLogbook, RegistrationReport};
use crate::error::LogbookError;
use crate::models::{Money, OperationId};

const LABEL_WIDTH: usize = 40;

/// One node of the classification tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRow {
    /// Distance from the root (root is 0)
    pub depth: usize,
    /// Descriptions from the root down, joined by `/`
    pub path: String,
    /// Description of the node
    pub description: String,
    /// Number of operations registered at this node
    pub count: usize,
    /// Sum of the operations, absent when empty
    pub sum: Option<Money>,
    /// Earliest timestamp, absent when empty
    pub from: Option<DateTime<Utc>>,
    /// Latest timestamp, absent when empty
    pub till: Option<DateTime<Utc>>,
}

/// An operation the tree refused
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedOperation {
    pub operation: OperationId,
    pub reason: String,
}

/// Classification Report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationReport {
    /// Rows in depth-first order
    pub rows: Vec<CategoryRow>,
    /// Operations rejected during registration
    pub rejected: Vec<RejectedOperation>,
    /// Transfer legs the root criterion kept out
    pub excluded_transfer_legs: usize,
}

impl ClassificationReport {
    /// Generate the report for a logbook tree
    pub fn generate(logbook: &CriteriaBasedLogbook) -> Self {
        let mut rows = Vec::new();
        collect_rows(logbook, 0, "", &mut rows);
        Self {
            rows,
            rejected: Vec::new(),
            excluded_transfer_legs: 0,
        }
    }

    /// Attach the failures of a registration run
    ///
    /// A leg listed in `transfer_legs` that the root did not match is counted
    /// as excluded rather than rejected.
    pub fn with_rejections(
        mut self,
        registration: &RegistrationReport,
        transfer_legs: &HashSet<OperationId>,
    ) -> Self {
        self.rejected.clear();
        self.excluded_transfer_legs = 0;
        for (operation, error) in &registration.failures {
            let excluded = transfer_legs.contains(operation)
                && matches!(error, LogbookError::OperationDidNotMatchCriteria { .. });
            if excluded {
                self.excluded_transfer_legs += 1;
            } else {
                self.rejected.push(RejectedOperation {
                    operation: *operation,
                    reason: error.to_string(),
                });
            }
        }
        self
    }

    /// Find a row by its full path
    pub fn row(&self, path: &str) -> Option<&CategoryRow> {
        self.rows.iter().find(|row| row.path == path)
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, date_format: &str) -> String {
        let mut output = String::new();

        output.push_str("Classification Report\n");
        output.push_str(&double_separator(90));
        output.push('\n');
        output.push_str(&format!(
            "{:<40} {:>8} {:>16}  {}\n",
            "Category", "Count", "Sum", "Period"
        ));
        output.push_str(&separator(90));
        output.push('\n');

        for row in &self.rows {
            let label = truncate(&indent(&row.description, row.depth), LABEL_WIDTH);
            output.push_str(&format!(
                "{:<40} {:>8} {:>16}  {}\n",
                label,
                row.count,
                format_sum(row.sum.as_ref()),
                format_range(row.from, row.till, date_format)
            ));
        }

        if self.excluded_transfer_legs > 0 {
            output.push_str(&separator(90));
            output.push('\n');
            output.push_str(&format!(
                "Excluded transfer legs: {}\n",
                self.excluded_transfer_legs
            ));
        }

        if !self.rejected.is_empty() {
            output.push_str(&separator(90));
            output.push('\n');
            output.push_str(&format!("Rejected operations: {}\n", self.rejected.len()));
            for rejected in &self.rejected {
                output.push_str(&format!("  {}: {}\n", rejected.operation, rejected.reason));
            }
        }

        output
    }
}

fn collect_rows(
    logbook: &CriteriaBasedLogbook,
    depth: usize,
    parent_path: &str,
    rows: &mut Vec<CategoryRow>,
) {
    let description = logbook.criterion().description().to_string();
    let path = if parent_path.is_empty() {
        description.clone()
    } else {
        format!("{}/{}", parent_path, description)
    };

    let book = logbook.logbook();
    let (from, till) = if book.is_empty() {
        (None, None)
    } else {
        (Some(book.from()), Some(book.till()))
    };

    rows.push(CategoryRow {
        depth,
        path: path.clone(),
        description,
        count: book.len(),
        sum: book.sum().cloned(),
        from,
        till,
    });

    for child in logbook.children().values() {
        collect_rows(child, depth + 1, &path, rows);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::Criterion;
    use crate::models::{BudgetId, Currency, Operation, Tag};
    use chrono::{Duration, TimeZone};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn op_in(day: i64, amount: Decimal, description: &str, currency: &str) -> Operation {
        Operation::new(
            BudgetId::new(),
            Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap() + Duration::days(day),
            Money::new(amount, Currency::new(currency).unwrap()),
        )
        .with_description(description)
    }

    fn op(day: i64, amount: Decimal, description: &str) -> Operation {
        op_in(day, amount, description, "EUR")
    }

    fn tree() -> CriteriaBasedLogbook {
        let criterion = Criterion::universal("All").with_subcriteria([
            Criterion::predicate("Income", |op: &Operation| op.is_income()),
            Criterion::predicate("Expenses", |op: &Operation| op.is_withdraw()).with_subcriterion(
                Criterion::predicate("Food", |op: &Operation| op.description.contains("Food")),
            ),
        ]);
        CriteriaBasedLogbook::new(criterion)
    }

    #[test]
    fn test_rows_follow_tree() {
        let mut logbook = tree();
        let report = logbook.register_all([
            Arc::new(op(0, dec!(1000), "Salary")),
            Arc::new(op(1, dec!(-30), "Food market")),
            Arc::new(op(2, dec!(-70), "Rent")),
            Arc::new(op_in(3, dec!(5), "Refund", "USD")),
        ]);

        let classification =
            ClassificationReport::generate(&logbook).with_rejections(&report, &HashSet::new());
        let paths: Vec<&str> = classification.rows.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, ["All", "All/Expenses", "All/Expenses/Food", "All/Income"]);

        let expenses = classification.row("All/Expenses").unwrap();
        assert_eq!(expenses.depth, 1);
        assert_eq!(expenses.count, 2);
        assert_eq!(expenses.sum.as_ref().unwrap().amount(), dec!(-100));
        assert_eq!(classification.row("All").unwrap().count, 3);
        assert_eq!(classification.rejected.len(), 1);
        assert_eq!(classification.excluded_transfer_legs, 0);
    }

    #[test]
    fn test_transfer_legs_are_excluded_not_rejected() {
        let criterion = Criterion::excluding("All", [Tag::transfer_source(), Tag::transfer_sink()]);
        let mut logbook = CriteriaBasedLogbook::new(criterion);

        let leg = op(0, dec!(-500), "To savings").with_tag(Tag::transfer_source());
        let legs: HashSet<OperationId> = [leg.id].into_iter().collect();
        let report = logbook.register_all([
            Arc::new(leg),
            Arc::new(op(1, dec!(-20), "Bakery")),
            Arc::new(op_in(2, dec!(-3), "Coffee", "USD")),
        ]);

        let classification =
            ClassificationReport::generate(&logbook).with_rejections(&report, &legs);
        assert_eq!(classification.excluded_transfer_legs, 1);
        assert_eq!(classification.rejected.len(), 1);

        let text = classification.format_terminal("%Y-%m-%d");
        assert!(text.contains("Excluded transfer legs: 1"));
        assert!(text.contains("Rejected operations: 1"));
    }

    #[test]
    fn test_empty_tree_has_no_sum() {
        let classification = ClassificationReport::generate(&tree());
        assert_eq!(classification.rows.len(), 1);
        assert!(classification.rows[0].sum.is_none());
        assert!(classification.rows[0].from.is_none());

        let text = classification.format_terminal("%Y-%m-%d");
        assert!(text.contains("All"));
        assert!(!text.contains("Rejected"));
    }

    #[test]
    fn test_terminal_format() {
        let mut logbook = tree();
        logbook.register(Arc::new(op(1, dec!(-30), "Food market"))).unwrap();

        let text = ClassificationReport::generate(&logbook).format_terminal("%d.%m.%Y");
        assert!(text.contains("    Food"));
        assert!(text.contains("-30.00 EUR"));
        assert!(text.contains("02.04.2024 .. 02.04.2024"));
    }
}
