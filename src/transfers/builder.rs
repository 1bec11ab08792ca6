//! Incremental transfer matching over an operation stream
//!
//! The builder is a greedy first-fit matcher: each incoming operation is
//! paired with the first unmatched part of opposite sign that the detector
//! accepts. It never revisits earlier pairings, so the result depends on the
//! order of the stream.

use super::detector::TransferDetector;
use super::transfer::Transfer;
use crate::models::{Operation, Tag};

/// Transfers and residue of a finished scan
#[derive(Debug, Clone, Default)]
pub struct TransferScan {
    /// Detected transfers in detection order
    pub transfers: Vec<Transfer>,
    /// Operations that were not paired
    pub unmatched: Vec<Operation>,
}

/// Stateful, single-pass transfer matcher
#[derive(Debug, Clone)]
pub struct TransferBuilder {
    detector: TransferDetector,
    source_tag: Tag,
    sink_tag: Tag,
    transfers: Vec<Transfer>,
    unmatched: Vec<Operation>,
}

impl TransferBuilder {
    /// Create a builder tagging legs with the default transfer tags
    pub fn new(detector: TransferDetector) -> Self {
        Self::with_tags(detector, Tag::transfer_source(), Tag::transfer_sink())
    }

    /// Create a builder with custom tags for source and sink legs
    pub fn with_tags(detector: TransferDetector, source_tag: Tag, sink_tag: Tag) -> Self {
        Self {
            detector,
            source_tag,
            sink_tag,
            transfers: Vec::new(),
            unmatched: Vec::new(),
        }
    }

    /// Consume one operation
    ///
    /// Returns the transfer it completed, if any. Otherwise the operation
    /// joins the unmatched parts.
    pub fn push(&mut self, operation: Operation) -> Option<&Transfer> {
        let found = self
            .unmatched
            .iter()
            .enumerate()
            .filter(|(_, part)| opposite_signs(part, &operation))
            .find_map(|(index, part)| {
                let result = if part.amount.amount() > operation.amount.amount() {
                    self.detector.detect(&operation, part)
                } else {
                    self.detector.detect(part, &operation)
                };
                match result {
                    Ok(transfer) => Some((index, transfer)),
                    Err(reason) => {
                        tracing::trace!(
                            part = %part.id,
                            incoming = %operation.id,
                            %reason,
                            "not a transfer"
                        );
                        None
                    }
                }
            });

        match found {
            Some((index, mut transfer)) => {
                self.unmatched.remove(index);
                transfer.tag_legs(&self.source_tag, &self.sink_tag);
                self.transfers.push(transfer);
                self.transfers.last()
            }
            None => {
                self.unmatched.push(operation);
                None
            }
        }
    }

    /// Consume every operation of an iterator in order
    pub fn extend<I>(&mut self, operations: I)
    where
        I: IntoIterator<Item = Operation>,
    {
        for operation in operations {
            self.push(operation);
        }
    }

    /// Transfers detected so far
    pub fn transfers(&self) -> &[Transfer] {
        &self.transfers
    }

    /// Operations not paired so far, in arrival order
    pub fn unmatched(&self) -> &[Operation] {
        &self.unmatched
    }

    /// Forget all transfers and unmatched parts
    pub fn clear(&mut self) {
        self.transfers.clear();
        self.unmatched.clear();
    }

    /// Finish the scan, returning transfers and residue
    pub fn finish(self) -> TransferScan {
        tracing::info!(
            transfers = self.transfers.len(),
            unmatched = self.unmatched.len(),
            "transfer scan finished"
        );
        TransferScan {
            transfers: self.transfers,
            unmatched: self.unmatched,
        }
    }
}

fn opposite_signs(a: &Operation, b: &Operation) -> bool {
    (a.is_withdraw() && b.is_income()) || (a.is_income() && b.is_withdraw())
}
