//! Transfer detection
//!
//! [`TransferDetector`] judges a single pair of operations against ranked
//! [`TransferCriterion`]s; [`TransferBuilder`] runs it greedily over a stream.

pub mod builder;
pub mod criterion;
pub mod detector;
pub mod transfer;

pub use builder::{TransferBuilder, TransferScan};
pub use criterion::{PairPredicate, TransferCriterion};
pub use detector::TransferDetector;
pub use transfer::{DetectionAccuracy, Transfer};
