//! Transfer criteria
//!
//! A transfer criterion judges an oriented (source, sink) pair. The detector
//! ranks matching criteria by their accuracy.

use std::fmt;
use std::sync::Arc;

use super::transfer::DetectionAccuracy;
use crate::models::{Money, Operation};

/// Injected boolean function over a (source, sink) pair
pub type PairPredicate = Arc<dyn Fn(&Operation, &Operation) -> bool + Send + Sync>;

/// A ranked rule deciding whether two operations form a transfer
#[derive(Clone)]
pub struct TransferCriterion {
    accuracy: DetectionAccuracy,
    comment: String,
    predicate: PairPredicate,
}

impl TransferCriterion {
    /// Create a criterion from a closure
    ///
    /// The comment may contain `{source}`, `{sink}` and `{fee}` placeholders.
    pub fn new<F>(accuracy: DetectionAccuracy, comment: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Operation, &Operation) -> bool + Send + Sync + 'static,
    {
        Self::from_predicate(accuracy, comment, Arc::new(predicate))
    }

    /// Create a criterion from an already shared predicate
    pub fn from_predicate(
        accuracy: DetectionAccuracy,
        comment: impl Into<String>,
        predicate: PairPredicate,
    ) -> Self {
        Self {
            accuracy,
            comment: comment.into(),
            predicate,
        }
    }

    /// A criterion accepting every oriented pair
    pub fn always(accuracy: DetectionAccuracy, comment: impl Into<String>) -> Self {
        Self::new(accuracy, comment, |_, _| true)
    }

    /// Confidence assigned to pairs this criterion accepts
    pub fn accuracy(&self) -> DetectionAccuracy {
        self.accuracy
    }

    /// The comment template
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Evaluate the predicate
    pub fn matches(&self, source: &Operation, sink: &Operation) -> bool {
        (self.predicate)(source, sink)
    }

    /// Expand the comment template for a pair
    pub fn render_comment(&self, source: &Operation, sink: &Operation, fee: &Money) -> String {
        self.comment
            .replace("{source}", &source.description)
            .replace("{sink}", &sink.description)
            .replace("{fee}", &fee.to_string())
    }
}

impl fmt::Debug for TransferCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransferCriterion")
            .field("accuracy", &self.accuracy)
            .field("comment", &self.comment)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetId, Currency};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    #[test]
    fn test_render_comment() {
        let eur = Currency::new("EUR").unwrap();
        let source = Operation::new(BudgetId::new(), Utc::now(), Money::new(dec!(-10), eur.clone()))
            .with_description("To savings");
        let sink = Operation::new(BudgetId::new(), Utc::now(), Money::new(dec!(9.5), eur.clone()))
            .with_description("From checking");
        let fee = Money::new(dec!(-0.5), eur);

        let criterion = TransferCriterion::always(
            DetectionAccuracy::Likely,
            "{source} => {sink}, lost {fee}",
        );
        assert!(criterion.matches(&source, &sink));
        assert_eq!(
            criterion.render_comment(&source, &sink, &fee),
            "To savings => From checking, lost -0.50 EUR"
        );
    }
}
