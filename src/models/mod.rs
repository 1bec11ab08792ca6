//! Core data models for criteria-logbook
//!
//! Value types (money, currency, tags), identifiers and the operation record
//! that flows through classification and transfer detection.

pub mod ids;
pub mod money;
pub mod operation;
pub mod tag;

pub use ids::{BudgetId, OperationId};
pub use money::{Currency, Money};
pub use operation::Operation;
pub use tag::Tag;
