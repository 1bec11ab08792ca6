//! Reports module for criteria-logbook
//!
//! Serializable summaries of a classification tree and of a transfer scan,
//! with terminal formatting.

pub mod classification;
pub mod transfers;

pub use classification::{CategoryRow, ClassificationReport, RejectedOperation};
pub use transfers::{TransferReport, TransferRow, UnmatchedRow};
