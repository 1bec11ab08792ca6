//! Transfer model

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{Money, Operation, Tag};

/// Confidence of a transfer detection, ordered from weakest to strongest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionAccuracy {
    /// Plausible pairing, worth a human look
    Likely,
    /// Pairing beyond reasonable doubt
    Exact,
}

impl fmt::Display for DetectionAccuracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Likely => write!(f, "Likely"),
            Self::Exact => write!(f, "Exact"),
        }
    }
}

/// Money moved between two of the user's own budgets
///
/// `source` is the withdraw leg and `sink` the income leg; `fee` is their
/// signed sum, i.e. what was lost (negative) or gained on the way.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transfer {
    source: Operation,
    sink: Operation,
    fee: Money,
    comment: String,
    accuracy: DetectionAccuracy,
}

impl Transfer {
    /// Build a transfer from already validated legs of one currency
    pub(crate) fn new(
        source: Operation,
        sink: Operation,
        fee: Money,
        comment: String,
        accuracy: DetectionAccuracy,
    ) -> Self {
        Self {
            source,
            sink,
            fee,
            comment,
            accuracy,
        }
    }

    /// The withdraw leg
    pub fn source(&self) -> &Operation {
        &self.source
    }

    /// The income leg
    pub fn sink(&self) -> &Operation {
        &self.sink
    }

    /// `sink.amount + source.amount`
    pub fn fee(&self) -> &Money {
        &self.fee
    }

    /// Comment produced by the matching transfer criterion
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Confidence of the detection
    pub fn accuracy(&self) -> DetectionAccuracy {
        self.accuracy
    }

    /// Check whether both legs carry exactly opposite amounts
    pub fn is_fee_free(&self) -> bool {
        self.fee.is_zero()
    }

    /// Mark both legs so reports can tell them apart from plain operations
    pub(crate) fn tag_legs(&mut self, source_tag: &Tag, sink_tag: &Tag) {
        self.source.tag(source_tag.clone());
        self.sink.tag(sink_tag.clone());
    }

    /// Split into source and sink legs
    pub fn into_legs(self) -> (Operation, Operation) {
        (self.source, self.sink)
    }
}

impl fmt::Display for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} (fee {}, {})",
            self.source.amount, self.sink.amount, self.fee, self.accuracy
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy_ordering() {
        assert!(DetectionAccuracy::Likely < DetectionAccuracy::Exact);
        assert_eq!(
            [DetectionAccuracy::Exact, DetectionAccuracy::Likely]
                .iter()
                .max(),
            Some(&DetectionAccuracy::Exact)
        );
    }

    #[test]
    fn test_accuracy_serialization() {
        let json = serde_json::to_string(&DetectionAccuracy::Exact).unwrap();
        assert_eq!(json, "\"exact\"");
        let back: DetectionAccuracy = serde_json::from_str("\"likely\"").unwrap();
        assert_eq!(back, DetectionAccuracy::Likely);
    }
}
