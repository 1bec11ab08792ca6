//! Logbooks: time-ordered aggregates of operations
//!
//! - [`Logbook`]: a single-currency collection with a running sum
//! - [`CriteriaBasedLogbook`]: a tree of logbooks following a criterion tree

pub mod criteria_based;
pub mod logbook;

pub use criteria_based::{CriteriaBasedLogbook, RegistrationReport};
pub use logbook::Logbook;
