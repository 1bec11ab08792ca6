//! Transfer Report
//!
//! Lists the transfers a scan detected and the operations left unpaired.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::display::truncate;
use crate::models::{Money, Operation, OperationId};
use crate::transfers::{DetectionAccuracy, TransferScan};

/// One detected transfer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferRow {
    pub source_id: OperationId,
    pub sink_id: OperationId,
    /// Timestamp of the withdraw leg
    pub date: DateTime<Utc>,
    pub source: String,
    pub sink: String,
    /// Amount that left the source budget
    pub amount: Money,
    pub fee: Money,
    pub accuracy: DetectionAccuracy,
    pub comment: String,
}

/// An operation that found no counterpart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnmatchedRow {
    pub id: OperationId,
    pub date: DateTime<Utc>,
    pub description: String,
    pub amount: Money,
}

impl From<&Operation> for UnmatchedRow {
    fn from(operation: &Operation) -> Self {
        Self {
            id: operation.id,
            date: operation.timestamp,
            description: operation.description.clone(),
            amount: operation.amount.clone(),
        }
    }
}

/// Transfer Report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferReport {
    pub transfers: Vec<TransferRow>,
    pub unmatched: Vec<UnmatchedRow>,
}

#[derive(Tabled)]
struct TransferCells {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "From")]
    source: String,
    #[tabled(rename = "To")]
    sink: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Fee")]
    fee: String,
    #[tabled(rename = "Accuracy")]
    accuracy: String,
    #[tabled(rename = "Comment")]
    comment: String,
}

impl TransferReport {
    /// Generate the report from a finished scan
    pub fn generate(scan: &TransferScan) -> Self {
        let transfers = scan
            .transfers
            .iter()
            .map(|transfer| TransferRow {
                source_id: transfer.source().id,
                sink_id: transfer.sink().id,
                date: transfer.source().timestamp,
                source: transfer.source().description.clone(),
                sink: transfer.sink().description.clone(),
                amount: transfer.source().amount.abs(),
                fee: transfer.fee().clone(),
                accuracy: transfer.accuracy(),
                comment: transfer.comment().to_string(),
            })
            .collect();

        let unmatched = scan.unmatched.iter().map(UnmatchedRow::from).collect();

        Self {
            transfers,
            unmatched,
        }
    }

    /// Number of transfers detected with the given accuracy
    pub fn count_with_accuracy(&self, accuracy: DetectionAccuracy) -> usize {
        self.transfers
            .iter()
            .filter(|row| row.accuracy == accuracy)
            .count()
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, date_format: &str) -> String {
        let mut output = String::new();

        if self.transfers.is_empty() {
            output.push_str("No transfers detected.\n");
        } else {
            let cells = self.transfers.iter().map(|row| TransferCells {
                date: row.date.format(date_format).to_string(),
                source: truncate(&row.source, 30),
                sink: truncate(&row.sink, 30),
                amount: row.amount.to_string(),
                fee: row.fee.to_string(),
                accuracy: row.accuracy.to_string(),
                comment: truncate(&row.comment, 40),
            });
            let mut table = Table::new(cells);
            table.with(Style::rounded());
            output.push_str(&table.to_string());
            output.push('\n');
            output.push_str(&format!(
                "Transfers: {} ({} exact, {} likely)\n",
                self.transfers.len(),
                self.count_with_accuracy(DetectionAccuracy::Exact),
                self.count_with_accuracy(DetectionAccuracy::Likely)
            ));
        }

        output.push_str(&format!("Unmatched operations: {}\n", self.unmatched.len()));
        for row in &self.unmatched {
            output.push_str(&format!(
                "  {} {:<30} {:>14}\n",
                row.date.format(date_format),
                truncate(&row.description, 30),
                row.amount
            ));
        }

        output
    }
}
