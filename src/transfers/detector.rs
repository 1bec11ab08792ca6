//! Transfer detection for a single candidate pair

use super::criterion::TransferCriterion;
use super::transfer::Transfer;
use crate::error::{LogbookError, LogbookResult};
use crate::models::Operation;

/// Decides whether two operations form a transfer
#[derive(Debug, Clone, Default)]
pub struct TransferDetector {
    criteria: Vec<TransferCriterion>,
}

impl TransferDetector {
    /// Create a detector over criteria in declaration order
    pub fn new(criteria: Vec<TransferCriterion>) -> Self {
        Self { criteria }
    }

    /// The configured criteria
    pub fn criteria(&self) -> &[TransferCriterion] {
        &self.criteria
    }

    /// Detect a transfer between two operations given in any order
    ///
    /// The operation with the smaller amount is taken as the source. Among
    /// the criteria accepting the pair, the most accurate one wins; on equal
    /// accuracy the first declared one wins.
    pub fn detect(&self, first: &Operation, second: &Operation) -> LogbookResult<Transfer> {
        if !first.amount.same_currency(&second.amount) {
            return Err(LogbookError::SourceAndSinkHaveDifferentCurrencies {
                source_currency: first.amount.currency().clone(),
                sink_currency: second.amount.currency().clone(),
            });
        }

        let (source, sink) = if second.amount.amount() < first.amount.amount() {
            (second, first)
        } else {
            (first, second)
        };

        if !source.is_withdraw() {
            return Err(LogbookError::SourceIsNotAWithdraw(source.id));
        }
        if !sink.is_income() {
            return Err(LogbookError::SinkIsNotAnIncome(sink.id));
        }

        let mut best: Option<&TransferCriterion> = None;
        for criterion in &self.criteria {
            if !criterion.matches(source, sink) {
                continue;
            }
            if best.map_or(true, |current| criterion.accuracy() > current.accuracy()) {
                best = Some(criterion);
            }
        }

        let criterion = best.ok_or(LogbookError::NoTransferCriteriaMatched {
            source_id: source.id,
            sink_id: sink.id,
        })?;

        let fee = sink.amount.checked_add(&source.amount)?;
        let comment = criterion.render_comment(source, sink, &fee);
        tracing::debug!(
            source = %source.id,
            sink = %sink.id,
            accuracy = %criterion.accuracy(),
            fee = %fee,
            "transfer detected"
        );

        Ok(Transfer::new(
            source.clone(),
            sink.clone(),
            fee,
            comment,
            criterion.accuracy(),
        ))
    }
}
